//! Locale registry: single source of truth for the supported locales.
//!
//! The registry is built once at startup from a list of [`LocaleConfig`]s and
//! is immutable thereafter. Construction enforces the registry invariants:
//! at least one locale, no duplicate codes and exactly one default.

use crate::error::ConfigError;
use crate::i18n::Locale;
use std::collections::HashSet;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Code used as the URL prefix (e.g., "en", "fr")
    pub code: &'static str,

    /// English name of the language (e.g., "French")
    pub name: &'static str,

    /// Native name shown in the language switcher (e.g., "Français")
    pub native_name: &'static str,

    /// Flag emoji shown in the language switcher
    pub flag: &'static str,

    /// Whether this is the default locale (exactly one must be true)
    pub is_default: bool,
}

/// Immutable set of registered locales.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default_index: usize,
}

impl LocaleRegistry {
    /// Build a registry, validating its invariants.
    ///
    /// # Returns
    /// * `Ok(LocaleRegistry)` if the list is non-empty, has no duplicate codes
    ///   and exactly one default
    /// * `Err(ConfigError)` describing the first violated invariant otherwise
    pub fn new(locales: Vec<LocaleConfig>) -> Result<Self, ConfigError> {
        if locales.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        let mut seen = HashSet::new();
        for config in &locales {
            if !seen.insert(config.code) {
                return Err(ConfigError::DuplicateLocale(config.code.to_string()));
            }
        }

        let defaults: Vec<usize> = locales
            .iter()
            .enumerate()
            .filter(|(_, config)| config.is_default)
            .map(|(index, _)| index)
            .collect();

        match defaults.as_slice() {
            [] => Err(ConfigError::NoDefaultLocale),
            [index] => Ok(LocaleRegistry {
                default_index: *index,
                locales,
            }),
            many => Err(ConfigError::MultipleDefaultLocales(
                many.iter().map(|&i| locales[i].code.to_string()).collect(),
            )),
        }
    }

    /// The reference registry with `default_code` marked as default.
    ///
    /// # Returns
    /// * `Err(ConfigError::UnknownDefaultLocale)` if `default_code` is not one
    ///   of the reference locales
    pub fn reference(default_code: &str) -> Result<Self, ConfigError> {
        let mut locales = reference_locales();
        if !locales.iter().any(|config| config.code == default_code) {
            return Err(ConfigError::UnknownDefaultLocale(default_code.to_string()));
        }
        for config in &mut locales {
            config.is_default = config.code == default_code;
        }
        Self::new(locales)
    }

    /// Look up a registered locale by its code.
    pub fn get(&self, code: &str) -> Option<Locale> {
        self.locales
            .iter()
            .find(|config| config.code == code)
            .map(|config| Locale::new(config.code))
    }

    /// Look up a registered locale by primary subtag ("fr" for "fr-CH").
    pub fn get_by_primary_subtag(&self, subtag: &str) -> Option<Locale> {
        self.locales
            .iter()
            .map(|config| Locale::new(config.code))
            .find(|locale| locale.primary_subtag().eq_ignore_ascii_case(subtag))
    }

    /// Metadata for a locale issued by this registry.
    pub fn config(&self, locale: Locale) -> Option<&LocaleConfig> {
        self.locales.iter().find(|config| config.code == locale.code())
    }

    /// The default locale.
    pub fn default_locale(&self) -> Locale {
        Locale::new(self.locales[self.default_index].code)
    }

    /// Whether `locale` is the default locale.
    pub fn is_default(&self, locale: Locale) -> bool {
        locale == self.default_locale()
    }

    /// All registered locales in declaration order.
    pub fn locales(&self) -> impl Iterator<Item = Locale> + '_ {
        self.locales.iter().map(|config| Locale::new(config.code))
    }

    /// All locale configurations in declaration order.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Check if a code is registered.
    pub fn is_registered(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

/// Locales the portfolio is published in. English is the default.
pub fn reference_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            flag: "🇺🇸",
            is_default: true,
        },
        LocaleConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            flag: "🇫🇷",
            is_default: false,
        },
        LocaleConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            flag: "🇵🇹",
            is_default: false,
        },
        LocaleConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
            flag: "🇩🇪",
            is_default: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(code: &'static str, is_default: bool) -> LocaleConfig {
        LocaleConfig {
            code,
            name: code,
            native_name: code,
            flag: "",
            is_default,
        }
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_reference_registry() {
        let registry = LocaleRegistry::reference("en").unwrap();
        let codes: Vec<_> = registry.locales().map(|l| l.code()).collect();
        assert_eq!(codes, vec!["en", "fr", "pt", "de"]);
        assert_eq!(registry.default_locale().code(), "en");
    }

    #[test]
    fn test_reference_with_other_default() {
        let registry = LocaleRegistry::reference("fr").unwrap();
        assert_eq!(registry.default_locale().code(), "fr");
        assert!(!registry.config(registry.get("en").unwrap()).unwrap().is_default);
    }

    #[test]
    fn test_reference_unknown_default() {
        let result = LocaleRegistry::reference("es");
        assert_eq!(
            result.unwrap_err(),
            ConfigError::UnknownDefaultLocale("es".to_string())
        );
    }

    #[test]
    fn test_empty_registry_rejected() {
        let result = LocaleRegistry::new(vec![]);
        assert_eq!(result.unwrap_err(), ConfigError::EmptyRegistry);
    }

    #[test]
    fn test_duplicate_locale_rejected() {
        let result = LocaleRegistry::new(vec![locale("en", true), locale("en", false)]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateLocale("en".to_string())
        );
    }

    #[test]
    fn test_missing_default_rejected() {
        let result = LocaleRegistry::new(vec![locale("en", false), locale("fr", false)]);
        assert_eq!(result.unwrap_err(), ConfigError::NoDefaultLocale);
    }

    #[test]
    fn test_multiple_defaults_rejected() {
        let result = LocaleRegistry::new(vec![locale("en", true), locale("fr", true)]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MultipleDefaultLocales(vec!["en".to_string(), "fr".to_string()])
        );
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_by_code() {
        let registry = LocaleRegistry::reference("en").unwrap();
        assert_eq!(registry.get("pt").map(|l| l.code()), Some("pt"));
        assert!(registry.get("es").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_get_is_case_sensitive() {
        let registry = LocaleRegistry::reference("en").unwrap();
        assert!(registry.get("FR").is_none());
    }

    #[test]
    fn test_get_by_primary_subtag() {
        let registry = LocaleRegistry::new(vec![locale("en", true), locale("pt-BR", false)])
            .unwrap();
        assert_eq!(
            registry.get_by_primary_subtag("PT").map(|l| l.code()),
            Some("pt-BR")
        );
        assert!(registry.get_by_primary_subtag("fr").is_none());
    }

    #[test]
    fn test_config_metadata() {
        let registry = LocaleRegistry::reference("en").unwrap();
        let german = registry.get("de").unwrap();
        let config = registry.config(german).unwrap();
        assert_eq!(config.native_name, "Deutsch");
        assert_eq!(config.flag, "🇩🇪");
    }

    #[test]
    fn test_is_default_and_registered() {
        let registry = LocaleRegistry::reference("en").unwrap();
        assert!(registry.is_default(registry.get("en").unwrap()));
        assert!(!registry.is_default(registry.get("fr").unwrap()));
        assert!(registry.is_registered("de"));
        assert!(!registry.is_registered("xx"));
        assert_eq!(registry.len(), 4);
        assert!(!registry.is_empty());
        assert_eq!(registry.list_all().len(), 4);
    }
}

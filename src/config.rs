use crate::routing::{DetectionSource, LocalePrefix};
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Locales
    pub default_locale: String,
    pub locale_prefix: LocalePrefix,

    // Detection
    pub locale_detection: bool,
    pub detection_order: Vec<DetectionSource>,
    pub locale_cookie: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            // Server
            port: lookup("PORT")
                .map(|v| v.trim().parse())
                .transpose()
                .context("PORT must be a port number")?
                .unwrap_or(3000),

            // Locales
            default_locale: lookup("DEFAULT_LOCALE")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "en".to_string()),
            locale_prefix: lookup("LOCALE_PREFIX")
                .map(|v| v.parse())
                .transpose()
                .context("LOCALE_PREFIX must be 'always' or 'as-needed'")?
                .unwrap_or_default(),

            // Detection
            locale_detection: lookup("LOCALE_DETECTION")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("LOCALE_DETECTION must be 'true' or 'false'")?
                .unwrap_or(true),
            detection_order: lookup("LOCALE_DETECTION_ORDER")
                .map(|v| DetectionSource::parse_order(&v))
                .transpose()
                .context("Invalid LOCALE_DETECTION_ORDER")?
                .unwrap_or_else(DetectionSource::default_order),
            locale_cookie: lookup("LOCALE_COOKIE")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "NEXT_LOCALE".to_string()),
        })
    }

    /// Detection sources the resolver should consult, empty when detection is off.
    pub fn effective_detection(&self) -> Vec<DetectionSource> {
        if self.locale_detection {
            self.detection_order.clone()
        } else {
            Vec::new()
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => anyhow::bail!("'{}' is not a boolean", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    // ==================== Default Tests ====================

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.locale_prefix, LocalePrefix::Always);
        assert!(config.locale_detection);
        assert_eq!(config.detection_order, DetectionSource::default_order());
        assert_eq!(config.locale_cookie, "NEXT_LOCALE");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DEFAULT_LOCALE", "fr"),
            ("LOCALE_PREFIX", "as-needed"),
            ("LOCALE_DETECTION_ORDER", "accept-language, cookie"),
            ("LOCALE_COOKIE", "lang"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_locale, "fr");
        assert_eq!(config.locale_prefix, LocalePrefix::AsNeeded);
        assert_eq!(
            config.detection_order,
            vec![DetectionSource::AcceptLanguage, DetectionSource::Cookie]
        );
        assert_eq!(config.locale_cookie, "lang");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config =
            Config::from_lookup(lookup(&[("DEFAULT_LOCALE", "  "), ("LOCALE_COOKIE", "")])).unwrap();
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.locale_cookie, "NEXT_LOCALE");
    }

    // ==================== Detection Tests ====================

    #[test]
    fn test_detection_disabled() {
        let config = Config::from_lookup(lookup(&[("LOCALE_DETECTION", "false")])).unwrap();
        assert!(!config.locale_detection);
        assert!(config.effective_detection().is_empty());
    }

    #[test]
    fn test_detection_enabled_uses_order() {
        let config = Config::from_lookup(lookup(&[("LOCALE_DETECTION_ORDER", "cookie")])).unwrap();
        assert_eq!(config.effective_detection(), vec![DetectionSource::Cookie]);
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_invalid_port() {
        let error = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(error.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_prefix_policy() {
        let error = Config::from_lookup(lookup(&[("LOCALE_PREFIX", "never")])).unwrap_err();
        assert!(error.to_string().contains("LOCALE_PREFIX"));
    }

    #[test]
    fn test_invalid_detection_flag() {
        let error = Config::from_lookup(lookup(&[("LOCALE_DETECTION", "maybe")])).unwrap_err();
        assert!(error.to_string().contains("LOCALE_DETECTION"));
    }

    #[test]
    fn test_invalid_detection_order() {
        let error =
            Config::from_lookup(lookup(&[("LOCALE_DETECTION_ORDER", "cookie,geoip")])).unwrap_err();
        assert!(error.to_string().contains("LOCALE_DETECTION_ORDER"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool(" 1 ").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("").is_err());
    }

    // ==================== Environment Tests ====================

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("LOCALE_PREFIX", "as-needed");
        std::env::set_var("PORT", "4321");
        let config = Config::from_env();
        std::env::remove_var("LOCALE_PREFIX");
        std::env::remove_var("PORT");

        let config = config.unwrap();
        assert_eq!(config.locale_prefix, LocalePrefix::AsNeeded);
        assert_eq!(config.port, 4321);
    }
}

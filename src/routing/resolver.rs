//! Locale resolver: decides which locale an inbound request is served in.
//!
//! Precedence is an explicit, registered path prefix first, then the
//! configured detection sources in order (persisted cookie, Accept-Language),
//! then the default locale.

use crate::error::RoutingError;
use crate::i18n::{Locale, LocaleRegistry};
use crate::routing::template::path_segments;
use anyhow::{bail, Result};
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

/// Whether the default locale carries a path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalePrefix {
    /// Every locale, the default included, is prefixed (`/en/projects`)
    #[default]
    Always,

    /// The default locale is served without prefix (`/projects`)
    AsNeeded,
}

impl FromStr for LocalePrefix {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(LocalePrefix::Always),
            "as-needed" | "as_needed" => Ok(LocalePrefix::AsNeeded),
            other => bail!("Unknown locale prefix policy: '{}'", other),
        }
    }
}

/// A client hint consulted when the path has no locale prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// Previously persisted preference cookie
    Cookie,

    /// `Accept-Language` request header
    AcceptLanguage,
}

impl DetectionSource {
    /// Cookie first, then the header.
    pub fn default_order() -> Vec<DetectionSource> {
        vec![DetectionSource::Cookie, DetectionSource::AcceptLanguage]
    }

    /// Parse a comma-separated detection order such as `"cookie,accept-language"`.
    pub fn parse_order(value: &str) -> Result<Vec<DetectionSource>> {
        let mut order = Vec::new();
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let source: DetectionSource = part.parse()?;
            if order.contains(&source) {
                bail!("Detection source '{}' listed twice", part);
            }
            order.push(source);
        }
        Ok(order)
    }
}

impl FromStr for DetectionSource {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cookie" => Ok(DetectionSource::Cookie),
            "accept-language" | "header" => Ok(DetectionSource::AcceptLanguage),
            other => bail!("Unknown locale detection source: '{}'", other),
        }
    }
}

/// Which rule chose the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocaleSource {
    Prefix,
    Cookie,
    AcceptLanguage,
    Default,
}

impl LocaleSource {
    /// Whether the locale came from client hints rather than the URL.
    pub fn is_detected(&self) -> bool {
        matches!(self, LocaleSource::Cookie | LocaleSource::AcceptLanguage)
    }
}

/// Client locale hints carried by a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleHints {
    /// Raw `Accept-Language` header value
    pub accept_language: Option<String>,

    /// Value of the locale preference cookie
    pub cookie: Option<String>,
}

impl LocaleHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accept_language(mut self, value: impl Into<String>) -> Self {
        self.accept_language = Some(value.into());
        self
    }

    pub fn with_cookie(mut self, value: impl Into<String>) -> Self {
        self.cookie = Some(value.into());
        self
    }
}

/// Outcome of resolving the locale of one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleResolution {
    pub locale: Locale,
    pub source: LocaleSource,

    /// The path with the locale prefix removed
    pub remainder: String,

    /// The path is not in canonical prefix form for `locale` and the caller
    /// should redirect (permanently) to the canonical URL
    pub redirect: bool,
}

static LOCALE_SHAPE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Whether a path segment looks like a language tag (`fr`, `deu`, `pt-BR`).
pub fn is_locale_shaped(segment: &str) -> bool {
    let regex = LOCALE_SHAPE_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z]{2,3}(?:[-_][A-Za-z0-9]{2,8})*$").unwrap());
    regex.is_match(segment)
}

/// Parse an `Accept-Language` value into tags ordered by preference.
///
/// Tags without `q` have quality 1. Entries with `q=0`, a malformed quality
/// or the `*` wildcard are dropped. Equal qualities keep header order.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut tags: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let mut quality = 1.0;
            for param in pieces {
                let Some((name, q)) = param.split_once('=') else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = q
                        .trim()
                        .parse::<f32>()
                        .ok()
                        .filter(|q| (0.0..=1.0).contains(q))?;
                }
            }
            (quality > 0.0).then_some((tag, quality))
        })
        .collect();

    // sort_by is stable, so ties keep header order
    tags.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    tags.into_iter().map(|(tag, _)| tag.to_string()).collect()
}

/// Resolves request locales against a registry.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    registry: LocaleRegistry,
    prefix: LocalePrefix,
    detection: Vec<DetectionSource>,
}

impl LocaleResolver {
    /// Create a resolver. An empty `detection` list disables detection.
    pub fn new(
        registry: LocaleRegistry,
        prefix: LocalePrefix,
        detection: Vec<DetectionSource>,
    ) -> Self {
        Self {
            registry,
            prefix,
            detection,
        }
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    pub fn prefix_policy(&self) -> LocalePrefix {
        self.prefix
    }

    pub fn detection_order(&self) -> &[DetectionSource] {
        &self.detection
    }

    /// Whether URLs in `locale` carry a prefix under the configured policy.
    pub fn is_prefixed(&self, locale: Locale) -> bool {
        match self.prefix {
            LocalePrefix::Always => true,
            LocalePrefix::AsNeeded => !self.registry.is_default(locale),
        }
    }

    /// Split a registered locale prefix off `path`.
    ///
    /// # Returns
    /// * `Some((locale, remainder))` when the first segment is a registered code
    /// * `None` otherwise; a locale-shaped but unregistered segment is logged
    ///   and left in the path
    pub fn split_prefix(&self, path: &str) -> Option<(Locale, String)> {
        let segments = path_segments(path);
        let first = *segments.first()?;

        match self.registry.get(first) {
            Some(locale) => Some((locale, format!("/{}", segments[1..].join("/")))),
            None => {
                if is_locale_shaped(first) {
                    let condition = RoutingError::UnregisteredLocale {
                        code: first.to_string(),
                    };
                    debug!("{}, treating it as a path segment", condition);
                }
                None
            }
        }
    }

    /// Run the detection sources in order.
    pub fn detect(&self, hints: &LocaleHints) -> Option<(Locale, LocaleSource)> {
        self.detection.iter().find_map(|source| match source {
            DetectionSource::Cookie => hints
                .cookie
                .as_deref()
                .and_then(|value| self.registry.get(value.trim()))
                .map(|locale| (locale, LocaleSource::Cookie)),
            DetectionSource::AcceptLanguage => hints
                .accept_language
                .as_deref()
                .and_then(|header| self.negotiate(header))
                .map(|locale| (locale, LocaleSource::AcceptLanguage)),
        })
    }

    /// Pick the first preferred tag that names a registered locale, by full
    /// code or by primary subtag.
    pub fn negotiate(&self, accept_language: &str) -> Option<Locale> {
        parse_accept_language(accept_language).iter().find_map(|tag| {
            self.registry
                .locales()
                .find(|locale| locale.code().eq_ignore_ascii_case(tag))
                .or_else(|| {
                    let primary = tag.split(['-', '_']).next().unwrap_or(tag);
                    self.registry.get_by_primary_subtag(primary)
                })
        })
    }

    /// Resolve the locale of an inbound path.
    pub fn resolve(&self, path: &str, hints: &LocaleHints) -> LocaleResolution {
        if let Some((locale, remainder)) = self.split_prefix(path) {
            return LocaleResolution {
                locale,
                source: LocaleSource::Prefix,
                remainder,
                // a prefixed default locale is redundant under AsNeeded
                redirect: !self.is_prefixed(locale),
            };
        }

        let (locale, source) = self
            .detect(hints)
            .unwrap_or((self.registry.default_locale(), LocaleSource::Default));

        LocaleResolution {
            locale,
            source,
            remainder: format!("/{}", path_segments(path).join("/")),
            redirect: self.is_prefixed(locale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(prefix: LocalePrefix) -> LocaleResolver {
        LocaleResolver::new(
            LocaleRegistry::reference("en").unwrap(),
            prefix,
            DetectionSource::default_order(),
        )
    }

    fn code(resolution: &LocaleResolution) -> &'static str {
        resolution.locale.code()
    }

    // ==================== Prefix Tests ====================

    #[test]
    fn test_explicit_prefix_wins() {
        let resolution = resolver(LocalePrefix::Always).resolve("/fr/projects", &LocaleHints::new());
        assert_eq!(code(&resolution), "fr");
        assert_eq!(resolution.source, LocaleSource::Prefix);
        assert_eq!(resolution.remainder, "/projects");
        assert!(!resolution.redirect);
    }

    #[test]
    fn test_explicit_prefix_beats_hints() {
        let hints = LocaleHints::new()
            .with_cookie("de")
            .with_accept_language("pt");
        let resolution = resolver(LocalePrefix::Always).resolve("/fr", &hints);
        assert_eq!(code(&resolution), "fr");
        assert_eq!(resolution.remainder, "/");
    }

    #[test]
    fn test_unregistered_prefix_is_a_path_segment() {
        let resolution = resolver(LocalePrefix::Always).resolve("/xx/projects", &LocaleHints::new());
        assert_eq!(code(&resolution), "en");
        assert_eq!(resolution.source, LocaleSource::Default);
        assert_eq!(resolution.remainder, "/xx/projects");
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let resolution = resolver(LocalePrefix::Always).resolve("/FR/projects", &LocaleHints::new());
        assert_eq!(code(&resolution), "en");
        assert_eq!(resolution.remainder, "/FR/projects");
    }

    #[test]
    fn test_default_prefix_redirects_under_as_needed() {
        let resolution = resolver(LocalePrefix::AsNeeded).resolve("/en/projects", &LocaleHints::new());
        assert_eq!(code(&resolution), "en");
        assert!(resolution.redirect);
    }

    // ==================== Detection Tests ====================

    #[test]
    fn test_cookie_detection() {
        let hints = LocaleHints::new().with_cookie("pt");
        let resolution = resolver(LocalePrefix::Always).resolve("/projects", &hints);
        assert_eq!(code(&resolution), "pt");
        assert_eq!(resolution.source, LocaleSource::Cookie);
        assert!(resolution.redirect);
    }

    #[test]
    fn test_unregistered_cookie_ignored() {
        let hints = LocaleHints::new()
            .with_cookie("es")
            .with_accept_language("de");
        let resolution = resolver(LocalePrefix::Always).resolve("/", &hints);
        assert_eq!(code(&resolution), "de");
        assert_eq!(resolution.source, LocaleSource::AcceptLanguage);
    }

    #[test]
    fn test_cookie_beats_header_by_default() {
        let hints = LocaleHints::new()
            .with_cookie("fr")
            .with_accept_language("de");
        let resolution = resolver(LocalePrefix::Always).resolve("/", &hints);
        assert_eq!(code(&resolution), "fr");
    }

    #[test]
    fn test_detection_order_is_configurable() {
        let resolver = LocaleResolver::new(
            LocaleRegistry::reference("en").unwrap(),
            LocalePrefix::Always,
            vec![DetectionSource::AcceptLanguage, DetectionSource::Cookie],
        );
        let hints = LocaleHints::new()
            .with_cookie("fr")
            .with_accept_language("de");
        assert_eq!(code(&resolver.resolve("/", &hints)), "de");
    }

    #[test]
    fn test_detection_disabled() {
        let resolver = LocaleResolver::new(
            LocaleRegistry::reference("en").unwrap(),
            LocalePrefix::Always,
            Vec::new(),
        );
        let hints = LocaleHints::new().with_cookie("fr");
        let resolution = resolver.resolve("/projects", &hints);
        assert_eq!(code(&resolution), "en");
        assert_eq!(resolution.source, LocaleSource::Default);
    }

    #[test]
    fn test_default_fallback() {
        let resolution = resolver(LocalePrefix::Always).resolve("/projects", &LocaleHints::new());
        assert_eq!(code(&resolution), "en");
        assert_eq!(resolution.source, LocaleSource::Default);
        assert!(resolution.redirect);
    }

    #[test]
    fn test_default_locale_unprefixed_under_as_needed() {
        let resolution = resolver(LocalePrefix::AsNeeded).resolve("/projects", &LocaleHints::new());
        assert_eq!(code(&resolution), "en");
        assert!(!resolution.redirect);
    }

    #[test]
    fn test_detected_locale_redirects_under_as_needed() {
        let hints = LocaleHints::new().with_accept_language("fr-FR,fr;q=0.9");
        let resolution = resolver(LocalePrefix::AsNeeded).resolve("/projects", &hints);
        assert_eq!(code(&resolution), "fr");
        assert!(resolution.redirect);
    }

    // ==================== Accept-Language Tests ====================

    #[test]
    fn test_parse_accept_language_orders_by_quality() {
        let tags = parse_accept_language("de;q=0.5, fr-CH, en;q=0.8");
        assert_eq!(tags, vec!["fr-CH", "en", "de"]);
    }

    #[test]
    fn test_parse_accept_language_quality_name_ignores_case() {
        let tags = parse_accept_language("de;Q=0.5, fr;q=0.7, pt ; Q = 0.9");
        assert_eq!(tags, vec!["pt", "fr", "de"]);
        assert!(parse_accept_language("de;Q=0").is_empty());
    }

    #[test]
    fn test_parse_accept_language_ties_keep_order() {
        let tags = parse_accept_language("pt;q=0.7, de;q=0.7, fr");
        assert_eq!(tags, vec!["fr", "pt", "de"]);
    }

    #[test]
    fn test_parse_accept_language_drops_invalid_entries() {
        let tags = parse_accept_language("*, fr;q=0, de;q=abc, pt;q=2, en;q=0.1, ,");
        assert_eq!(tags, vec!["en"]);
    }

    #[test]
    fn test_negotiate_primary_subtag() {
        let resolver = resolver(LocalePrefix::Always);
        assert_eq!(
            resolver.negotiate("de;q=0.5, fr-CH, en;q=0.8").map(|l| l.code()),
            Some("fr")
        );
        assert_eq!(resolver.negotiate("PT-br").map(|l| l.code()), Some("pt"));
        assert_eq!(resolver.negotiate("es, it;q=0.9"), None);
    }

    #[test]
    fn test_negotiate_skips_unsupported_tags() {
        let resolver = resolver(LocalePrefix::Always);
        assert_eq!(resolver.negotiate("es-ES, es;q=0.9, de;q=0.3").map(|l| l.code()), Some("de"));
    }

    // ==================== Parsing Tests ====================

    #[test]
    fn test_locale_prefix_from_str() {
        assert_eq!("always".parse::<LocalePrefix>().unwrap(), LocalePrefix::Always);
        assert_eq!("As-Needed".parse::<LocalePrefix>().unwrap(), LocalePrefix::AsNeeded);
        assert!("never".parse::<LocalePrefix>().is_err());
    }

    #[test]
    fn test_detection_order_parse() {
        assert_eq!(
            DetectionSource::parse_order("accept-language, cookie").unwrap(),
            vec![DetectionSource::AcceptLanguage, DetectionSource::Cookie]
        );
        assert!(DetectionSource::parse_order("").unwrap().is_empty());
        assert!(DetectionSource::parse_order("cookie,cookie").is_err());
        assert!(DetectionSource::parse_order("geoip").is_err());
    }

    #[test]
    fn test_is_locale_shaped() {
        assert!(is_locale_shaped("xx"));
        assert!(is_locale_shaped("pt-BR"));
        assert!(is_locale_shaped("zh_Hant"));
        assert!(!is_locale_shaped("projects"));
        assert!(!is_locale_shaped("x"));
        assert!(!is_locale_shaped("12"));
    }

    #[test]
    fn test_locale_source_is_detected() {
        assert!(LocaleSource::Cookie.is_detected());
        assert!(LocaleSource::AcceptLanguage.is_detected());
        assert!(!LocaleSource::Prefix.is_detected());
        assert!(!LocaleSource::Default.is_detected());
    }
}

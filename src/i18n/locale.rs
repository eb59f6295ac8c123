//! Locale type: a validated handle onto a registered locale.
//!
//! A `Locale` can only be obtained from a [`LocaleRegistry`], so holding one
//! means the code was registered when the routing configuration was built.
//!
//! [`LocaleRegistry`]: crate::i18n::LocaleRegistry

use serde::{Serialize, Serializer};
use std::fmt;

/// A registered locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    /// Locale code as it appears in URLs (e.g., "en", "fr")
    code: &'static str,
}

impl Locale {
    pub(crate) const fn new(code: &'static str) -> Self {
        Locale { code }
    }

    /// Get the locale code.
    ///
    /// # Returns
    /// The code as a static string (e.g., "en", "pt").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Primary language subtag of the code ("pt" for "pt-BR").
    pub fn primary_subtag(&self) -> &'static str {
        self.code.split('-').next().unwrap_or(self.code)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code() {
        assert_eq!(Locale::new("fr").code(), "fr");
    }

    #[test]
    fn test_primary_subtag() {
        assert_eq!(Locale::new("pt-BR").primary_subtag(), "pt");
        assert_eq!(Locale::new("de").primary_subtag(), "de");
    }

    #[test]
    fn test_display() {
        assert_eq!(Locale::new("de").to_string(), "de");
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&Locale::new("pt")).unwrap();
        assert_eq!(json, "\"pt\"");
    }

    #[test]
    fn test_copy_and_equality() {
        let a = Locale::new("en");
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, Locale::new("fr"));
    }
}

//! Message catalog: the key→string lookup service the UI renders labels with.
//!
//! Bundles are plain JSON objects per locale. Keys are dotted paths into the
//! bundle (`"nav.home"`). A missing key renders as the key itself so a gap in
//! a bundle shows up on the page instead of failing the render.

use crate::i18n::Locale;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Translation bundles keyed by locale code.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bundles: HashMap<&'static str, Value>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the bundle for a locale code.
    pub fn with_bundle(mut self, code: &'static str, bundle: Value) -> Self {
        self.bundles.insert(code, bundle);
        self
    }

    /// Scope the catalog to one locale.
    pub fn translator(&self, locale: Locale) -> Translator<'_> {
        Translator {
            locale,
            bundle: self.bundles.get(locale.code()),
        }
    }

    /// Check whether `key` resolves to a string in the locale's bundle.
    pub fn has_key(&self, locale: Locale, key: &str) -> bool {
        self.translator(locale)
            .raw(key)
            .map(Value::is_string)
            .unwrap_or(false)
    }

    /// Bundles for the reference locales.
    pub fn reference() -> Self {
        Catalog::new()
            .with_bundle(
                "en",
                json!({
                    "nav": {
                        "home": "Home",
                        "projects": "Projects",
                        "blog": "Blog",
                        "language": "Language"
                    },
                    "notFound": {
                        "title": "Page not found",
                        "description": "Nothing lives at {path}."
                    }
                }),
            )
            .with_bundle(
                "fr",
                json!({
                    "nav": {
                        "home": "Accueil",
                        "projects": "Projets",
                        "blog": "Blog",
                        "language": "Langue"
                    },
                    "notFound": {
                        "title": "Page introuvable",
                        "description": "Rien ne se trouve à {path}."
                    }
                }),
            )
            .with_bundle(
                "pt",
                json!({
                    "nav": {
                        "home": "Início",
                        "projects": "Projetos",
                        "blog": "Blog",
                        "language": "Idioma"
                    },
                    "notFound": {
                        "title": "Página não encontrada",
                        "description": "Não há nada em {path}."
                    }
                }),
            )
            .with_bundle(
                "de",
                json!({
                    "nav": {
                        "home": "Startseite",
                        "projects": "Projekte",
                        "blog": "Blog",
                        "language": "Sprache"
                    },
                    "notFound": {
                        "title": "Seite nicht gefunden",
                        "description": "Unter {path} gibt es nichts."
                    }
                }),
            )
    }
}

/// Catalog view bound to the locale of the current request.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    locale: Locale,
    bundle: Option<&'a Value>,
}

impl<'a> Translator<'a> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// The raw JSON value stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        let pointer = format!("/{}", key.replace('.', "/"));
        self.bundle.and_then(|bundle| bundle.pointer(&pointer))
    }

    /// The string stored under `key`, or `key` itself when absent.
    pub fn t(&self, key: &str) -> String {
        match self.raw(key) {
            Some(Value::String(text)) => text.clone(),
            _ => key.to_string(),
        }
    }

    /// Like [`t`](Self::t), replacing `{name}` placeholders with the given values.
    pub fn t_with(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        substitutions
            .iter()
            .fold(self.t(key), |text, (name, value)| {
                text.replace(&format!("{{{}}}", name), value)
            })
    }
}

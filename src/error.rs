//! Error types for locale resolution, routing and startup configuration.

use crate::routing::ValidationReport;
use thiserror::Error;

/// Errors raised while building or resolving paths at request time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A locale-shaped path segment names a locale that is not registered.
    /// Recovered by treating the segment as an ordinary path segment.
    #[error("'{code}' is not a registered locale")]
    UnregisteredLocale { code: String },

    /// No template exists for the route in the requested locale.
    #[error("route '{route}' has no template for locale '{locale}'")]
    UnknownRoute { route: String, locale: String },

    /// A placeholder in the template was not given a value.
    #[error("route '{route}' requires parameter '{param}'")]
    MissingParameter { route: String, param: String },

    /// A parameter value cannot be rendered as a single path segment.
    #[error("parameter '{param}' of route '{route}' has invalid value {value:?}")]
    InvalidParameter {
        route: String,
        param: String,
        value: String,
    },

    /// The current route cannot be rendered in the target locale.
    #[error("route '{route}' cannot be rendered in locale '{locale}'")]
    UntranslatableRoute { route: String, locale: String },
}

/// A single startup configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no locales are registered")]
    EmptyRegistry,

    #[error("locale '{0}' is registered more than once")]
    DuplicateLocale(String),

    #[error("no default locale is configured")]
    NoDefaultLocale,

    #[error("multiple default locales are configured: {0:?}")]
    MultipleDefaultLocales(Vec<String>),

    #[error("default locale '{0}' is not registered")]
    UnknownDefaultLocale(String),

    #[error("route '{0}' is declared more than once")]
    DuplicateRoute(String),

    #[error("route '{route}' has no template for locale '{locale}'")]
    MissingTemplate { route: String, locale: String },

    #[error("route '{route}' declares a template for unregistered locale '{locale}'")]
    TemplateForUnknownLocale { route: String, locale: String },

    #[error("template {template:?} of route '{route}' is invalid: {reason}")]
    InvalidTemplate {
        route: String,
        template: String,
        reason: String,
    },

    #[error(
        "routes '{first}' and '{second}' both match {template:?} in locale '{locale}'"
    )]
    AmbiguousTemplates {
        locale: String,
        first: String,
        second: String,
        template: String,
    },

    #[error(
        "route '{route}' uses parameters {found:?} in locale '{locale}' but {expected:?} elsewhere"
    )]
    ParameterMismatch {
        route: String,
        locale: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error(
        "template {template:?} of route '{route}' starts with {segment:?}, which an unprefixed \
         '{locale}' URL would read as a locale prefix"
    )]
    ShadowedByLocalePrefix {
        route: String,
        locale: String,
        template: String,
        segment: String,
    },

    #[error("home route '{0}' is not declared")]
    MissingHomeRoute(String),

    #[error("navigation entry points at undeclared route '{0}'")]
    UnknownNavigationRoute(String),

    #[error("navigation entry route '{0}' requires parameters")]
    ParameterizedNavigationRoute(String),

    #[error("section root '{section}' references undeclared route '{route}'")]
    UnknownSectionRoute { section: String, route: String },
}

/// Fatal startup error carrying every problem found in the configuration.
#[derive(Debug, Error)]
#[error("invalid routing configuration: {}", .0.summary())]
pub struct InvalidConfig(pub ValidationReport);

impl InvalidConfig {
    /// The individual problems that made the configuration invalid.
    pub fn errors(&self) -> &[ConfigError] {
        &self.0.errors
    }
}

impl From<ConfigError> for InvalidConfig {
    fn from(error: ConfigError) -> Self {
        let mut report = ValidationReport::new();
        report.errors.push(error);
        InvalidConfig(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_template_names_route_and_locale() {
        let error = ConfigError::MissingTemplate {
            route: "projects".to_string(),
            locale: "pt".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("projects"));
        assert!(message.contains("'pt'"));
    }

    #[test]
    fn test_invalid_config_lists_every_error() {
        let mut report = ValidationReport::new();
        report.errors.push(ConfigError::EmptyRegistry);
        report.errors.push(ConfigError::DuplicateRoute("home".to_string()));

        let error = InvalidConfig(report);
        let message = error.to_string();
        assert!(message.contains("no locales are registered"));
        assert!(message.contains("'home' is declared more than once"));
        assert_eq!(error.errors().len(), 2);
    }

    #[test]
    fn test_invalid_config_from_single_error() {
        let error = InvalidConfig::from(ConfigError::NoDefaultLocale);
        assert_eq!(error.errors(), &[ConfigError::NoDefaultLocale]);
    }
}

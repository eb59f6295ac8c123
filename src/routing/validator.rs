//! Startup validation of the routing configuration.
//!
//! Every check appends to a [`ValidationReport`] instead of failing fast, so a
//! broken configuration reports all of its problems at once. Errors refuse
//! startup; warnings are logged.

use crate::error::{ConfigError, InvalidConfig};
use crate::i18n::{Catalog, LocaleRegistry};
use crate::routing::resolver::is_locale_shaped;
use crate::routing::{LocalePrefix, NavigationEntry, PathnameTable, SectionRoots};
use std::collections::HashMap;

/// Errors and warnings found while validating the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make the configuration unusable
    pub errors: Vec<ConfigError>,

    /// Suspicious but servable configuration
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Append the findings of another report.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// All errors joined into one line.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Err` if the report has errors, otherwise the report itself.
    pub fn into_result(self) -> Result<Self, InvalidConfig> {
        if self.has_errors() {
            Err(InvalidConfig(self))
        } else {
            Ok(self)
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for the routing configuration.
pub struct RoutingValidator;

impl RoutingValidator {
    /// Check the table against the registry.
    ///
    /// This checks that:
    /// - every route has a template for every registered locale
    /// - no two routes share a template shape within one locale
    /// - a route uses the same parameters in every locale
    pub fn validate_table(registry: &LocaleRegistry, table: &PathnameTable) -> ValidationReport {
        let mut report = ValidationReport::new();
        let default = registry.default_locale();

        for &route in table.routes() {
            let expected = table.template(route, default).map(|t| t.param_names());

            for locale in registry.locales() {
                let Some(template) = table.template(route, locale) else {
                    report.errors.push(ConfigError::MissingTemplate {
                        route: route.to_string(),
                        locale: locale.to_string(),
                    });
                    continue;
                };

                if let Some(expected) = &expected {
                    let found = template.param_names();
                    if &found != expected {
                        report.errors.push(ConfigError::ParameterMismatch {
                            route: route.to_string(),
                            locale: locale.to_string(),
                            expected: expected.iter().map(|s| s.to_string()).collect(),
                            found: found.iter().map(|s| s.to_string()).collect(),
                        });
                    }
                }
            }
        }

        for locale in registry.locales() {
            let mut shapes: HashMap<String, String> = HashMap::new();
            for &route in table.routes() {
                let Some(template) = table.template(route, locale) else {
                    continue;
                };
                let shape = template.shape();
                if let Some(first) = shapes.get(&shape) {
                    report.errors.push(ConfigError::AmbiguousTemplates {
                        locale: locale.to_string(),
                        first: first.clone(),
                        second: route.to_string(),
                        template: shape,
                    });
                } else {
                    shapes.insert(shape, route.to_string());
                }
            }
        }

        report
    }

    /// Check that unprefixed default-locale URLs cannot be mistaken for
    /// prefixed ones.
    ///
    /// Under `AsNeeded` the default locale's paths carry no prefix, so a
    /// template starting with a registered code or with a placeholder (whose
    /// value may be a code) would be split off as a locale prefix.
    pub fn validate_prefix_policy(
        registry: &LocaleRegistry,
        table: &PathnameTable,
        prefix: LocalePrefix,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        if prefix != LocalePrefix::AsNeeded {
            return report;
        }

        let default = registry.default_locale();
        for &route in table.routes() {
            let Some(template) = table.template(route, default) else {
                continue;
            };
            let Some(segment) = template.first_segment() else {
                continue;
            };
            if template.starts_with_param() || registry.is_registered(&segment) {
                report.errors.push(ConfigError::ShadowedByLocalePrefix {
                    route: route.to_string(),
                    locale: default.to_string(),
                    template: template.source().to_string(),
                    segment,
                });
            }
        }
        report
    }

    /// Warn about locale codes the prefix detector will not recognise as
    /// locale-shaped (they still work as prefixes).
    pub fn validate_locales(registry: &LocaleRegistry) -> ValidationReport {
        let mut report = ValidationReport::new();
        for locale in registry.locales() {
            if !is_locale_shaped(locale.code()) {
                report.warnings.push(format!(
                    "Locale code '{}' does not look like a language tag",
                    locale.code()
                ));
            }
        }
        report
    }

    /// Check that navigation entries and section roots only reference
    /// declared routes.
    pub fn validate_navigation(
        table: &PathnameTable,
        entries: &[NavigationEntry],
        sections: &SectionRoots,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        for entry in entries {
            if !table.contains(entry.route) {
                report
                    .errors
                    .push(ConfigError::UnknownNavigationRoute(entry.route.to_string()));
            } else if table.requires_params(entry.route) {
                report.errors.push(ConfigError::ParameterizedNavigationRoute(
                    entry.route.to_string(),
                ));
            }
        }

        for (section, descendants) in sections.iter() {
            for &route in std::iter::once(&section).chain(descendants) {
                if !table.contains(route) {
                    report.errors.push(ConfigError::UnknownSectionRoute {
                        section: section.to_string(),
                        route: route.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Warn about navigation labels missing from a locale's catalog.
    pub fn validate_labels(
        registry: &LocaleRegistry,
        catalog: &Catalog,
        entries: &[NavigationEntry],
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        for locale in registry.locales() {
            for entry in entries {
                if !catalog.has_key(locale, entry.label_key) {
                    report.warnings.push(format!(
                        "Label '{}' is missing for locale '{}'",
                        entry.label_key, locale
                    ));
                }
            }
        }
        report
    }
}

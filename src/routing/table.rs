//! Pathname translation table: logical route × locale → path template.
//!
//! The table is declared once with [`PathnameTableBuilder`], validated eagerly
//! against the locale registry and never mutated afterwards.

use crate::error::{ConfigError, InvalidConfig, RoutingError};
use crate::i18n::{Locale, LocaleRegistry};
use crate::routing::template::path_segments;
use crate::routing::{
    Params, PathTemplate, RouteId, RoutingValidator, ValidationReport, BLOG, BLOG_POST, HOME,
    PROJECTS,
};
use std::collections::HashMap;

/// How a route's path is declared.
#[derive(Debug, Clone)]
pub enum Pathname {
    /// One template used for every locale
    Shared(&'static str),

    /// One template per locale code; every registered locale must be present
    Localized(Vec<(&'static str, &'static str)>),
}

/// A successful match of a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: RouteId,
    pub params: Params,
}

/// Declarative builder for a [`PathnameTable`].
#[derive(Debug, Clone, Default)]
pub struct PathnameTableBuilder {
    routes: Vec<(RouteId, Pathname)>,
}

impl PathnameTableBuilder {
    /// Declare a route whose template is the same in every locale.
    pub fn route(mut self, route: RouteId, template: &'static str) -> Self {
        self.routes.push((route, Pathname::Shared(template)));
        self
    }

    /// Declare a route with a template per locale code.
    pub fn localized(
        mut self,
        route: RouteId,
        templates: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        self.routes
            .push((route, Pathname::Localized(templates.into_iter().collect())));
        self
    }

    /// Parse and validate every declaration against `registry`.
    ///
    /// # Returns
    /// * `Ok((PathnameTable, ValidationReport))` when there are no errors; the
    ///   report may still carry warnings
    /// * `Err(InvalidConfig)` listing every problem otherwise
    pub fn build(
        self,
        registry: &LocaleRegistry,
    ) -> Result<(PathnameTable, ValidationReport), InvalidConfig> {
        let mut report = ValidationReport::new();
        let mut routes = Vec::new();
        let mut templates = HashMap::new();

        for (route, pathname) in self.routes {
            if routes.contains(&route) {
                report
                    .errors
                    .push(ConfigError::DuplicateRoute(route.to_string()));
                continue;
            }
            routes.push(route);

            let declared: Vec<(Locale, &'static str)> = match pathname {
                Pathname::Shared(source) => registry.locales().map(|l| (l, source)).collect(),
                Pathname::Localized(entries) => entries
                    .into_iter()
                    .filter_map(|(code, source)| match registry.get(code) {
                        Some(locale) => Some((locale, source)),
                        None => {
                            report.errors.push(ConfigError::TemplateForUnknownLocale {
                                route: route.to_string(),
                                locale: code.to_string(),
                            });
                            None
                        }
                    })
                    .collect(),
            };

            for (locale, source) in declared {
                match PathTemplate::parse(source) {
                    Ok(template) => {
                        templates.insert((route, locale), template);
                    }
                    Err(error) => report.errors.push(ConfigError::InvalidTemplate {
                        route: route.to_string(),
                        template: source.to_string(),
                        reason: error.to_string(),
                    }),
                }
            }
        }

        let table = PathnameTable { routes, templates };
        report.merge(RoutingValidator::validate_table(registry, &table));
        let report = report.into_result()?;
        Ok((table, report))
    }
}

/// Validated route × locale → template mapping.
#[derive(Debug, Clone)]
pub struct PathnameTable {
    routes: Vec<RouteId>,
    templates: HashMap<(RouteId, Locale), PathTemplate>,
}

impl PathnameTable {
    pub fn builder() -> PathnameTableBuilder {
        PathnameTableBuilder::default()
    }

    /// Declarations for the portfolio's pages.
    pub fn reference_builder() -> PathnameTableBuilder {
        Self::builder()
            .route(HOME, "/")
            .route(PROJECTS, "/projects")
            .route(BLOG, "/blog")
            .route(BLOG_POST, "/blog/[slug]")
    }

    /// Declared routes in declaration order.
    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }

    pub fn contains(&self, route: RouteId) -> bool {
        self.routes.contains(&route)
    }

    pub fn template(&self, route: RouteId, locale: Locale) -> Option<&PathTemplate> {
        self.templates.get(&(route, locale))
    }

    /// Whether any template of the route has placeholders.
    pub fn requires_params(&self, route: RouteId) -> bool {
        self.templates
            .iter()
            .any(|((id, _), template)| *id == route && !template.param_names().is_empty())
    }

    /// Render the locale-specific path (without locale prefix) for a route.
    pub fn render(
        &self,
        route: RouteId,
        locale: Locale,
        params: &Params,
    ) -> Result<String, RoutingError> {
        let template = self
            .template(route, locale)
            .ok_or_else(|| RoutingError::UnknownRoute {
                route: route.to_string(),
                locale: locale.to_string(),
            })?;
        template.render(route.name(), params)
    }

    /// Match a path (without locale prefix) against the locale's templates.
    ///
    /// The template with the most literal segments wins; ties go to the
    /// route declared first.
    pub fn match_path(&self, locale: Locale, path: &str) -> Option<RouteMatch> {
        let segments = path_segments(path);
        let mut best: Option<(usize, RouteMatch)> = None;

        for &route in &self.routes {
            let Some(template) = self.template(route, locale) else {
                continue;
            };
            let Some(params) = template.matches(&segments) else {
                continue;
            };
            let score = template.literal_count();
            if best.as_ref().map_or(true, |(best_score, _)| score > *best_score) {
                best = Some((score, RouteMatch { route, params }));
            }
        }

        best.map(|(_, found)| found)
    }
}

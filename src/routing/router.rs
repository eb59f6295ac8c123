//! Router facade: the one surface the UI uses to read and build URLs.
//!
//! Every href is produced by rendering the pathname table and applying the
//! locale prefix policy here, so links, redirects and locale switches always
//! agree with the URL scheme the resolver accepts.

use crate::error::{ConfigError, InvalidConfig, RoutingError};
use crate::i18n::{Locale, LocaleRegistry};
use crate::routing::{
    ActiveStateMatcher, DetectionSource, LocaleHints, LocalePrefix, LocaleResolver, LocaleSource,
    NavigationEntry, PageContext, Params, PathnameTable, PathnameTableBuilder, RouteId, RouteMatch,
    RoutingValidator, SectionRoots, ValidationReport, HOME,
};
use tracing::{debug, warn};

/// The logical page a request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedRoute {
    Page(RouteId),
    NotFound,
}

impl ResolvedRoute {
    pub fn route(&self) -> Option<RouteId> {
        match self {
            ResolvedRoute::Page(route) => Some(*route),
            ResolvedRoute::NotFound => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolvedRoute::NotFound)
    }
}

/// Locale, route and parameters parsed from one inbound path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub locale: Locale,
    pub route: ResolvedRoute,
    pub params: Params,
}

/// A resolved request plus what the host must do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub request: ResolvedRequest,

    /// Which rule chose the locale
    pub source: LocaleSource,

    /// Canonical URL to permanently redirect to, when the inbound path is not it
    pub redirect: Option<String>,
}

/// Builder collecting the startup configuration of a [`LocaleRouter`].
#[derive(Debug, Clone)]
pub struct RouterBuilder {
    registry: LocaleRegistry,
    prefix: LocalePrefix,
    detection: Vec<DetectionSource>,
    table: PathnameTableBuilder,
    home: RouteId,
    navigation: Vec<NavigationEntry>,
    sections: SectionRoots,
}

impl RouterBuilder {
    pub fn prefix(mut self, prefix: LocalePrefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// Detection sources in precedence order; empty disables detection.
    pub fn detection(mut self, detection: Vec<DetectionSource>) -> Self {
        self.detection = detection;
        self
    }

    pub fn table(mut self, table: PathnameTableBuilder) -> Self {
        self.table = table;
        self
    }

    /// Route used when a locale switch cannot keep the current page.
    pub fn home(mut self, home: RouteId) -> Self {
        self.home = home;
        self
    }

    pub fn navigation(mut self, navigation: Vec<NavigationEntry>) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn sections(mut self, sections: SectionRoots) -> Self {
        self.sections = sections;
        self
    }

    /// Validate everything and build the router.
    ///
    /// # Returns
    /// * `Ok((LocaleRouter, ValidationReport))` with any warnings
    /// * `Err(InvalidConfig)` listing every configuration error
    pub fn build(self) -> Result<(LocaleRouter, ValidationReport), InvalidConfig> {
        let (table, mut report) = self.table.build(&self.registry)?;

        report.merge(RoutingValidator::validate_locales(&self.registry));
        report.merge(RoutingValidator::validate_prefix_policy(
            &self.registry,
            &table,
            self.prefix,
        ));
        report.merge(RoutingValidator::validate_navigation(
            &table,
            &self.navigation,
            &self.sections,
        ));
        if !table.contains(self.home) {
            report
                .errors
                .push(ConfigError::MissingHomeRoute(self.home.to_string()));
        } else if table.requires_params(self.home) {
            report.warnings.push(format!(
                "Home route '{}' has parameters; locale fallbacks will use the bare locale root",
                self.home
            ));
        }
        let report = report.into_result()?;

        let router = LocaleRouter {
            resolver: LocaleResolver::new(self.registry, self.prefix, self.detection),
            table,
            home: self.home,
            navigation: self.navigation,
            matcher: ActiveStateMatcher::new(self.sections),
        };
        Ok((router, report))
    }
}

/// Locale-aware router over a validated configuration.
#[derive(Debug, Clone)]
pub struct LocaleRouter {
    resolver: LocaleResolver,
    table: PathnameTable,
    home: RouteId,
    navigation: Vec<NavigationEntry>,
    matcher: ActiveStateMatcher,
}

impl LocaleRouter {
    /// Start a configuration with no routes, `Always` prefixes and the
    /// default detection order.
    pub fn builder(registry: LocaleRegistry) -> RouterBuilder {
        RouterBuilder {
            registry,
            prefix: LocalePrefix::default(),
            detection: DetectionSource::default_order(),
            table: PathnameTable::builder(),
            home: HOME,
            navigation: Vec::new(),
            sections: SectionRoots::new(),
        }
    }

    /// The portfolio's routes, navigation and section roots.
    pub fn reference_builder(registry: LocaleRegistry) -> RouterBuilder {
        Self::builder(registry)
            .table(PathnameTable::reference_builder())
            .navigation(NavigationEntry::reference())
            .sections(SectionRoots::reference())
    }

    pub fn registry(&self) -> &LocaleRegistry {
        self.resolver.registry()
    }

    pub fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    pub fn table(&self) -> &PathnameTable {
        &self.table
    }

    pub fn navigation(&self) -> &[NavigationEntry] {
        &self.navigation
    }

    pub fn matcher(&self) -> &ActiveStateMatcher {
        &self.matcher
    }

    pub fn home(&self) -> RouteId {
        self.home
    }

    /// Full href (locale prefix included) for a route in a locale.
    pub fn build_href(
        &self,
        route: RouteId,
        locale: Locale,
        params: &Params,
    ) -> Result<String, RoutingError> {
        let path = self.table.render(route, locale, params)?;
        Ok(self.localize_path(locale, &path))
    }

    /// Root URL of a locale (`/fr`, or `/` for an unprefixed default).
    pub fn locale_root(&self, locale: Locale) -> String {
        self.localize_path(locale, "/")
    }

    fn localize_path(&self, locale: Locale, path: &str) -> String {
        if self.resolver.is_prefixed(locale) {
            prefixed(locale, path)
        } else {
            path.to_string()
        }
    }

    /// Resolve an inbound path into locale, route and parameters.
    ///
    /// Unprefixed paths are default-locale URLs, so they are matched against
    /// the default locale's templates even when detection picked another
    /// locale; the redirect then re-renders the route in that locale.
    pub fn resolve(&self, path: &str, hints: &LocaleHints) -> Resolution {
        let resolution = self.resolver.resolve(path, hints);
        let match_locale = match resolution.source {
            LocaleSource::Prefix => resolution.locale,
            _ => self.registry().default_locale(),
        };

        let Some(RouteMatch { route, params }) =
            self.table.match_path(match_locale, &resolution.remainder)
        else {
            debug!("No route matches {} in locale {}", path, resolution.locale);
            // Not-found paths are answered where they were requested, even when
            // the prefix is missing; there is no canonical URL to send them to.
            return Resolution {
                request: ResolvedRequest {
                    locale: resolution.locale,
                    route: ResolvedRoute::NotFound,
                    params: Params::new(),
                },
                source: resolution.source,
                redirect: None,
            };
        };

        let redirect = match self.build_href(route, resolution.locale, &params) {
            Ok(canonical) if resolution.redirect || canonical != path => {
                debug!(
                    "Redirecting {} to {} (locale from {:?})",
                    path, canonical, resolution.source
                );
                Some(canonical)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Cannot build canonical URL for {}: {}", path, e);
                None
            }
        };

        Resolution {
            request: ResolvedRequest {
                locale: resolution.locale,
                route: ResolvedRoute::Page(route),
                params,
            },
            source: resolution.source,
            redirect,
        }
    }

    /// Request-scoped view used while rendering one page.
    pub fn current(&self, resolved: ResolvedRequest) -> PageContext<'_> {
        PageContext::new(self, resolved)
    }

    /// Href of the same route and parameters in `target`.
    pub fn try_switch_locale(
        &self,
        resolved: &ResolvedRequest,
        target: Locale,
    ) -> Result<String, RoutingError> {
        let route = resolved
            .route
            .route()
            .filter(|&route| self.table.template(route, target).is_some())
            .ok_or_else(|| RoutingError::UntranslatableRoute {
                route: resolved
                    .route
                    .route()
                    .map_or("not-found", |route| route.name())
                    .to_string(),
                locale: target.to_string(),
            })?;
        self.build_href(route, target, &resolved.params)
    }

    /// Like [`try_switch_locale`](Self::try_switch_locale), falling back to
    /// the target locale's home page instead of failing.
    pub fn switch_locale(&self, resolved: &ResolvedRequest, target: Locale) -> String {
        match self.try_switch_locale(resolved, target) {
            Ok(href) => href,
            Err(e) => {
                if !resolved.route.is_not_found() {
                    warn!("Locale switch fell back to home: {}", e);
                }
                self.home_href(target)
            }
        }
    }

    /// Like [`switch_locale`](Self::switch_locale) but always carrying the
    /// target's prefix, even for an unprefixed default locale.
    ///
    /// Language switchers link here: following `/en/projects` is an explicit
    /// choice the host persists before redirecting to the canonical
    /// `/projects`, whereas a bare `/projects` would be re-detected.
    pub fn switch_locale_explicit(&self, resolved: &ResolvedRequest, target: Locale) -> String {
        let href = self.switch_locale(resolved, target);
        if self.resolver.is_prefixed(target) {
            href
        } else {
            prefixed(target, &href)
        }
    }

    /// Href of the home route in `locale`.
    pub fn home_href(&self, locale: Locale) -> String {
        self.build_href(self.home, locale, &Params::new())
            .unwrap_or_else(|_| self.locale_root(locale))
    }

    /// Whether a navigation entry is active for the resolved request.
    pub fn is_active(&self, entry: &NavigationEntry, resolved: &ResolvedRequest) -> bool {
        self.matcher.is_active(entry, resolved)
    }
}

fn prefixed(locale: Locale, path: &str) -> String {
    if path == "/" {
        format!("/{}", locale.code())
    } else {
        format!("/{}{}", locale.code(), path)
    }
}

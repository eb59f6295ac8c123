//! Request-scoped page context handed to the rendering layer.

use crate::error::RoutingError;
use crate::i18n::{Locale, Translator};
use crate::routing::{LocaleRouter, Params, ResolvedRequest, ResolvedRoute, RouteId};
use serde::Serialize;
use tracing::warn;

/// One rendered navigation affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub route: RouteId,
    pub label: String,
    pub icon: &'static str,
    pub href: String,
    pub active: bool,
}

/// One entry of the language switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageLink {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
    pub flag: &'static str,
    pub href: String,
    pub current: bool,
}

/// The router bound to the request currently being rendered.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    router: &'a LocaleRouter,
    resolved: ResolvedRequest,
}

impl<'a> PageContext<'a> {
    pub fn new(router: &'a LocaleRouter, resolved: ResolvedRequest) -> Self {
        Self { router, resolved }
    }

    pub fn resolved(&self) -> &ResolvedRequest {
        &self.resolved
    }

    pub fn locale(&self) -> Locale {
        self.resolved.locale
    }

    pub fn route(&self) -> ResolvedRoute {
        self.resolved.route
    }

    /// Href of the current page in another locale.
    pub fn switch_locale(&self, target: Locale) -> String {
        self.router.switch_locale(&self.resolved, target)
    }

    /// Href of any route in the current locale.
    pub fn href(&self, route: RouteId, params: &Params) -> Result<String, RoutingError> {
        self.router.build_href(route, self.resolved.locale, params)
    }

    /// Navigation entries with translated labels, hrefs and active state.
    pub fn navigation_items(&self, translator: &Translator<'_>) -> Vec<NavItem> {
        self.router
            .navigation()
            .iter()
            .filter_map(|entry| {
                let href = match self.href(entry.route, &Params::new()) {
                    Ok(href) => href,
                    Err(e) => {
                        warn!("Skipping navigation entry '{}': {}", entry.route, e);
                        return None;
                    }
                };
                Some(NavItem {
                    route: entry.route,
                    label: translator.t(entry.label_key),
                    icon: entry.icon,
                    href,
                    active: self.router.is_active(entry, &self.resolved),
                })
            })
            .collect()
    }

    /// Every registered locale with the href of this page in it.
    ///
    /// Links to other locales always carry an explicit prefix so the choice
    /// overrides cookie and header detection.
    pub fn languages(&self) -> Vec<LanguageLink> {
        let registry = self.router.registry();
        registry
            .locales()
            .filter_map(|locale| {
                let config = registry.config(locale)?;
                let current = locale == self.resolved.locale;
                let href = if current {
                    self.switch_locale(locale)
                } else {
                    self.router.switch_locale_explicit(&self.resolved, locale)
                };
                Some(LanguageLink {
                    code: config.code,
                    name: config.name,
                    native_name: config.native_name,
                    flag: config.flag,
                    href,
                    current,
                })
            })
            .collect()
    }
}

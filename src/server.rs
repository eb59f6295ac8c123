//! HTTP host applying the locale router once per request.
//!
//! Every GET is resolved by [`LocaleRouter::resolve`]: non-canonical URLs get
//! a permanent redirect, unmatched routes a 404, and everything else a JSON
//! page view with navigation and the language switcher.

use crate::i18n::{Catalog, Locale, MetricsReport, ResolutionMetrics};
use crate::routing::{
    LanguageLink, LocaleHints, LocaleRouter, LocaleSource, NavItem, Params, ResolvedRoute,
    RouteId,
};
use axum::{
    extract::State,
    http::{
        header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE, VARY},
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Shared, read-only state of the HTTP service.
pub struct AppState {
    pub router: LocaleRouter,
    pub catalog: Catalog,

    /// Name of the cookie persisting the locale preference
    pub cookie_name: String,
}

/// JSON body of a rendered page.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub locale: Locale,
    pub route: RouteId,
    pub params: Params,
    pub navigation: Vec<NavItem>,
    pub languages: Vec<LanguageLink>,
}

/// Build the axum application.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/_metrics", get(metrics))
        .fallback(page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn metrics() -> Json<MetricsReport> {
    Json(ResolutionMetrics::global().report())
}

async fn page(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let cookie = cookie_value(&headers, &state.cookie_name);
    let mut hints = LocaleHints::new();
    if let Some(value) = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()) {
        hints = hints.with_accept_language(value);
    }
    if let Some(value) = &cookie {
        hints = hints.with_cookie(value.as_str());
    }

    let path = uri.path();
    let resolution = state.router.resolve(path, &hints);
    let metrics = ResolutionMetrics::global();
    metrics.record_source(resolution.source);

    if let Some(target) = resolution.redirect {
        metrics.record_redirect();
        let location = match uri.query() {
            Some(query) => format!("{}?{}", target, query),
            None => target,
        };
        debug!("308 {} -> {}", path, location);

        let mut response = Redirect::permanent(&location).into_response();
        if resolution.source.is_detected() {
            response
                .headers_mut()
                .insert(VARY, HeaderValue::from_static("Accept-Language, Cookie"));
        }
        // `/en/x` -> `/x` persists the choice so detection does not bounce it back
        if resolution.source == LocaleSource::Prefix {
            persist_locale(
                &mut response,
                &state.cookie_name,
                cookie.as_deref(),
                resolution.request.locale,
            );
        }
        return response;
    }

    let request = resolution.request;
    let locale = request.locale;
    let translator = state.catalog.translator(locale);

    let mut response = match request.route {
        ResolvedRoute::NotFound => {
            metrics.record_not_found();
            debug!("404 {} (locale {})", path, locale);
            let body = json!({
                "locale": locale,
                "path": path,
                "title": translator.t("notFound.title"),
                "error": translator.t_with("notFound.description", &[("path", path)]),
            });
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
        ResolvedRoute::Page(route) => {
            let params = request.params.clone();
            let page = state.router.current(request);
            let view = PageView {
                locale,
                route,
                params,
                navigation: page.navigation_items(&translator),
                languages: page.languages(),
            };
            Json(view).into_response()
        }
    };

    persist_locale(&mut response, &state.cookie_name, cookie.as_deref(), locale);
    response
}

/// Set the preference cookie unless it already holds `locale`.
fn persist_locale(response: &mut Response, name: &str, current: Option<&str>, locale: Locale) {
    if current == Some(locale.code()) {
        return;
    }
    let value = format!("{}={}; Path=/; SameSite=Lax", name, locale);
    match HeaderValue::from_str(&value) {
        Ok(value) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Err(e) => warn!("Cannot persist locale cookie: {}", e),
    }
}

/// Value of the named cookie across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn test_cookie_value_found() {
        let headers = headers(&["theme=dark; NEXT_LOCALE=fr; other=1"]);
        assert_eq!(cookie_value(&headers, "NEXT_LOCALE"), Some("fr".to_string()));
    }

    #[test]
    fn test_cookie_value_across_headers() {
        let headers = headers(&["theme=dark", "NEXT_LOCALE=\"pt\""]);
        assert_eq!(cookie_value(&headers, "NEXT_LOCALE"), Some("pt".to_string()));
    }

    #[test]
    fn test_cookie_value_missing() {
        assert_eq!(cookie_value(&headers(&["theme=dark"]), "NEXT_LOCALE"), None);
        assert_eq!(cookie_value(&HeaderMap::new(), "NEXT_LOCALE"), None);
    }

    #[test]
    fn test_cookie_name_is_exact() {
        let headers = headers(&["MY_NEXT_LOCALE=de"]);
        assert_eq!(cookie_value(&headers, "NEXT_LOCALE"), None);
    }
}

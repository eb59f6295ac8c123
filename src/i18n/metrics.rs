//! Locale resolution metrics and observability.
//!
//! Counts how each request's locale was chosen and how requests ended
//! (rendered, redirected to their canonical URL, or not found).

use crate::routing::LocaleSource;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global resolution metrics singleton.
pub struct ResolutionMetrics {
    /// Locale taken from an explicit path prefix
    prefix: AtomicUsize,

    /// Locale taken from the persisted preference cookie
    cookie: AtomicUsize,

    /// Locale taken from the Accept-Language header
    accept_language: AtomicUsize,

    /// No hint matched, default locale used
    default: AtomicUsize,

    /// Requests answered with a redirect to the canonical URL
    redirects: AtomicUsize,

    /// Requests whose path matched no route
    not_found: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<ResolutionMetrics> = OnceLock::new();

impl ResolutionMetrics {
    /// Get the global metrics instance.
    pub fn global() -> &'static ResolutionMetrics {
        METRICS.get_or_init(|| ResolutionMetrics {
            prefix: AtomicUsize::new(0),
            cookie: AtomicUsize::new(0),
            accept_language: AtomicUsize::new(0),
            default: AtomicUsize::new(0),
            redirects: AtomicUsize::new(0),
            not_found: AtomicUsize::new(0),
        })
    }

    /// Record which rule chose the locale of a request.
    pub fn record_source(&self, source: LocaleSource) {
        let counter = match source {
            LocaleSource::Prefix => &self.prefix,
            LocaleSource::Cookie => &self.cookie,
            LocaleSource::AcceptLanguage => &self.accept_language,
            LocaleSource::Default => &self.default,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_redirect(&self) {
        self.redirects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let prefix = self.prefix.load(Ordering::Relaxed);
        let cookie = self.cookie.load(Ordering::Relaxed);
        let accept_language = self.accept_language.load(Ordering::Relaxed);
        let default = self.default.load(Ordering::Relaxed);
        let total = prefix + cookie + accept_language + default;

        let detection_rate = if total > 0 {
            ((cookie + accept_language) as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            resolutions: total,
            prefix,
            cookie,
            accept_language,
            default,
            detection_rate,
            redirects: self.redirects.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero (useful for testing).
    pub fn reset(&self) {
        self.prefix.store(0, Ordering::Relaxed);
        self.cookie.store(0, Ordering::Relaxed);
        self.accept_language.store(0, Ordering::Relaxed);
        self.default.store(0, Ordering::Relaxed);
        self.redirects.store(0, Ordering::Relaxed);
        self.not_found.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the resolution counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Total number of locale resolutions
    pub resolutions: usize,

    pub prefix: usize,
    pub cookie: usize,
    pub accept_language: usize,
    pub default: usize,

    /// Share of resolutions decided by cookie or header detection (0-100)
    pub detection_rate: f64,

    pub redirects: usize,
    pub not_found: usize,
}

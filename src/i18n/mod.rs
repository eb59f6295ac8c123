//! Internationalization (i18n) module: supported locales and their messages.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported locales and the default
//! - `locale`: `Locale` handle issued by the registry
//! - `messages`: Per-locale message catalog used for navigation labels
//! - `metrics`: Counters describing how request locales were resolved
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_routing::i18n::{Catalog, LocaleRegistry};
//!
//! let registry = LocaleRegistry::reference("en")?;
//! let french = registry.get("fr").unwrap();
//! let label = Catalog::reference().translator(french).t("nav.projects");
//! ```

mod locale;
mod messages;
mod metrics;
mod registry;

pub use locale::Locale;
pub use messages::{Catalog, Translator};
pub use metrics::{MetricsReport, ResolutionMetrics};
pub use registry::{reference_locales, LocaleConfig, LocaleRegistry};

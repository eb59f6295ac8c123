//! Locale-aware routing: pathname table, locale resolution and the router facade.
//!
//! # Architecture
//!
//! - `route`: Logical route identifiers and parameter maps
//! - `template`: Per-locale path templates with `[param]` placeholders
//! - `table`: Route x locale template table with forward and reverse lookup
//! - `resolver`: Prefix splitting, cookie and `Accept-Language` detection
//! - `router`: Facade building hrefs, resolving requests and switching locales
//! - `page`: Request-scoped context for navigation and the language switcher
//! - `navigation`: Navigation entries and active-state matching
//! - `validator`: Startup validation of the whole configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_routing::i18n::LocaleRegistry;
//! use portfolio_routing::routing::{LocaleHints, LocaleRouter, PROJECTS};
//!
//! let (router, _warnings) = LocaleRouter::reference_builder(LocaleRegistry::reference("en")?).build()?;
//! let resolution = router.resolve("/fr/projects", &LocaleHints::new());
//! let german = router.registry().get("de").unwrap();
//! assert_eq!(router.switch_locale(&resolution.request, german), "/de/projects");
//! ```

mod navigation;
mod page;
mod resolver;
mod route;
mod router;
mod table;
mod template;
mod validator;

pub use navigation::{ActiveStateMatcher, NavigationEntry, SectionRoots};
pub use page::{LanguageLink, NavItem, PageContext};
pub use resolver::{
    is_locale_shaped, parse_accept_language, DetectionSource, LocaleHints, LocalePrefix,
    LocaleResolution, LocaleResolver, LocaleSource,
};
pub use route::{params, Params, RouteId, BLOG, BLOG_POST, HOME, PROJECTS};
pub use router::{LocaleRouter, Resolution, ResolvedRequest, ResolvedRoute, RouterBuilder};
pub use table::{Pathname, PathnameTable, PathnameTableBuilder, RouteMatch};
pub use template::{path_segments, PathTemplate, TemplateError};
pub use validator::{RoutingValidator, ValidationReport};

//! Navigation entries and active-state matching.
//!
//! Active state is decided on logical routes only. Rendered paths differ per
//! locale, so they are never inspected here.

use crate::routing::{ResolvedRequest, ResolvedRoute, RouteId, BLOG, BLOG_POST, HOME, PROJECTS};

/// Static descriptor of one navigation affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub route: RouteId,

    /// Message catalog key of the label (e.g., "nav.home")
    pub label_key: &'static str,

    /// Icon identifier understood by the UI layer
    pub icon: &'static str,
}

impl NavigationEntry {
    /// The dock entries of the portfolio.
    pub fn reference() -> Vec<NavigationEntry> {
        vec![
            NavigationEntry {
                route: HOME,
                label_key: "nav.home",
                icon: "home",
            },
            NavigationEntry {
                route: PROJECTS,
                label_key: "nav.projects",
                icon: "folder",
            },
        ]
    }
}

/// Routes that stay highlighted while one of their declared descendants is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRoots {
    sections: Vec<(RouteId, Vec<RouteId>)>,
}

impl SectionRoots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `section` as the root of `descendants`.
    pub fn with_section(
        mut self,
        section: RouteId,
        descendants: impl IntoIterator<Item = RouteId>,
    ) -> Self {
        let descendants: Vec<RouteId> = descendants.into_iter().collect();
        match self.sections.iter_mut().find(|(root, _)| *root == section) {
            Some((_, existing)) => existing.extend(descendants),
            None => self.sections.push((section, descendants)),
        }
        self
    }

    /// The blog index covers individual posts.
    pub fn reference() -> Self {
        Self::new().with_section(BLOG, [BLOG_POST])
    }

    pub fn iter(&self) -> impl Iterator<Item = (RouteId, &[RouteId])> + '_ {
        self.sections
            .iter()
            .map(|(root, descendants)| (*root, descendants.as_slice()))
    }

    /// Whether `route` is a declared descendant of `section`.
    pub fn contains(&self, section: RouteId, route: RouteId) -> bool {
        self.sections
            .iter()
            .any(|(root, descendants)| *root == section && descendants.contains(&route))
    }
}

/// Decides which navigation entries are active for a resolved request.
#[derive(Debug, Clone, Default)]
pub struct ActiveStateMatcher {
    sections: SectionRoots,
}

impl ActiveStateMatcher {
    pub fn new(sections: SectionRoots) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &SectionRoots {
        &self.sections
    }

    /// An entry is active for its own route and, when it is a section root,
    /// for the section's declared descendants. Not-found pages activate nothing.
    pub fn is_active(&self, entry: &NavigationEntry, resolved: &ResolvedRequest) -> bool {
        match resolved.route {
            ResolvedRoute::Page(route) => {
                route == entry.route || self.sections.contains(entry.route, route)
            }
            ResolvedRoute::NotFound => false,
        }
    }
}

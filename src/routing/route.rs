//! Logical route identifiers and route parameters.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Named route parameters (e.g. `slug`). Values are opaque strings.
pub type Params = BTreeMap<String, String>;

/// Language-independent identifier of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(&'static str);

impl RouteId {
    pub const fn new(name: &'static str) -> Self {
        RouteId(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for RouteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Landing page.
pub const HOME: RouteId = RouteId::new("home");

/// Project list.
pub const PROJECTS: RouteId = RouteId::new("projects");

/// Blog index.
pub const BLOG: RouteId = RouteId::new("blog");

/// Single blog post, parameterized by `slug`.
pub const BLOG_POST: RouteId = RouteId::new("blogPost");

/// Build a [`Params`] map from name/value pairs.
pub fn params<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Params {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_name_and_display() {
        assert_eq!(BLOG_POST.name(), "blogPost");
        assert_eq!(PROJECTS.to_string(), "projects");
    }

    #[test]
    fn test_route_serializes_as_name() {
        assert_eq!(serde_json::to_string(&HOME).unwrap(), "\"home\"");
    }

    #[test]
    fn test_params_helper() {
        let p = params([("slug", "hello-world")]);
        assert_eq!(p.get("slug").map(String::as_str), Some("hello-world"));
        assert!(params([]).is_empty());
    }
}

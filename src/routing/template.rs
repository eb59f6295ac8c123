//! Path templates: literal segments plus `[name]` placeholders.
//!
//! A template such as `/blog/[slug]` renders to `/blog/hello` given
//! `slug = "hello"` and matches `/blog/hello` back to the same parameters.

use crate::error::RoutingError;
use crate::routing::Params;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a template string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template must start with '/'")]
    MissingLeadingSlash,

    #[error("segment {0:?} is not a literal or a [name] placeholder")]
    MalformedSegment(String),

    #[error("placeholder '{0}' appears more than once")]
    DuplicatePlaceholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Split a path into its non-empty segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

impl PathTemplate {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        if !source.starts_with('/') {
            return Err(TemplateError::MissingLeadingSlash);
        }

        let placeholder =
            PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"^\[([A-Za-z_][A-Za-z0-9_]*)\]$").unwrap());

        let mut seen = BTreeSet::new();
        let mut segments = Vec::new();
        for raw in path_segments(source) {
            if let Some(captures) = placeholder.captures(raw) {
                let name = captures[1].to_string();
                if !seen.insert(name.clone()) {
                    return Err(TemplateError::DuplicatePlaceholder(name));
                }
                segments.push(Segment::Param(name));
            } else if raw.contains(['[', ']', '?', '#']) {
                return Err(TemplateError::MalformedSegment(raw.to_string()));
            } else {
                segments.push(Segment::Literal(raw.to_string()));
            }
        }

        Ok(PathTemplate {
            source: source.to_string(),
            segments,
        })
    }

    /// The template as written in the configuration.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names used by this template.
    pub fn param_names(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// The first segment as written (`"blog"`, `"[slug]"`), `None` for `/`.
    pub fn first_segment(&self) -> Option<String> {
        self.segments.first().map(|segment| match segment {
            Segment::Literal(text) => text.clone(),
            Segment::Param(name) => format!("[{}]", name),
        })
    }

    /// Whether the first segment is a placeholder.
    pub fn starts_with_param(&self) -> bool {
        matches!(self.segments.first(), Some(Segment::Param(_)))
    }

    /// Number of literal segments; higher means more specific.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Literal(_)))
            .count()
    }

    /// The template with every placeholder replaced by `*`.
    ///
    /// Two templates with the same shape match exactly the same paths.
    pub fn shape(&self) -> String {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Param(_) => "*",
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    /// Substitute `params` into the template.
    ///
    /// `route` only labels errors. Parameters the template does not use are ignored.
    pub fn render(&self, route: &str, params: &Params) -> Result<String, RoutingError> {
        let mut parts = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => parts.push(text.as_str()),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| RoutingError::MissingParameter {
                        route: route.to_string(),
                        param: name.clone(),
                    })?;
                    if !is_valid_param_value(value) {
                        return Err(RoutingError::InvalidParameter {
                            route: route.to_string(),
                            param: name.clone(),
                            value: value.clone(),
                        });
                    }
                    parts.push(value.as_str());
                }
            }
        }
        Ok(format!("/{}", parts.join("/")))
    }

    /// Match already-split path segments, returning the captured parameters.
    pub fn matches(&self, segments: &[&str]) -> Option<Params> {
        if segments.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, value) in self.segments.iter().zip(segments) {
            match segment {
                Segment::Literal(text) if text == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), value.to_string());
                }
            }
        }
        Some(params)
    }
}

/// A parameter value must survive the trip through a single path segment.
fn is_valid_param_value(value: &str) -> bool {
    !value.is_empty() && !value.contains(['/', '?', '#'])
}

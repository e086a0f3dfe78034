//! Placeholder-bearing cascading lookup paths

use crate::error::{Error, Result};
use crate::layer::LayerStack;
use ctx_entries::EntryName;
use std::fmt;

/// The literal segment substituted when a placeholder's layer is not
/// active. Entries stored under a `%` segment act as "layer inactive"
/// defaults.
pub const WILDCARD: &str = "%";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// Matched verbatim (a bare `%` is a literal wildcard segment).
    Literal(String),
    /// `%id%` — replaced by the substitution value of layer `id`.
    Placeholder(String),
}

/// An immutable cascading name pattern, e.g. `/act/%activate%`.
///
/// Parsed once and reused across lookups; resolution against a layer
/// stack and an entry set is a pure function (see [`crate::resolver`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPath {
    text: String,
    segments: Vec<PathSegment>,
}

impl SpecPath {
    /// Parse a spec path.
    ///
    /// The path must be cascading (leading `/`) with non-empty
    /// segments. A segment of the form `%id%` is a placeholder; a bare
    /// `%` is the literal wildcard segment.
    pub fn parse(text: &str) -> Result<Self> {
        let rest = text.strip_prefix('/').ok_or_else(|| Error::InvalidSpecPath {
            path: text.to_string(),
            message: "spec paths are cascading and start with '/'".to_string(),
        })?;
        if rest.is_empty() {
            return Err(Error::InvalidSpecPath {
                path: text.to_string(),
                message: "path has no segments".to_string(),
            });
        }

        let mut segments = Vec::new();
        for raw in rest.split('/') {
            if raw.is_empty() {
                return Err(Error::InvalidSpecPath {
                    path: text.to_string(),
                    message: "empty segment".to_string(),
                });
            }
            let segment = match raw.strip_prefix('%').and_then(|s| s.strip_suffix('%')) {
                Some(id) if !id.is_empty() => PathSegment::Placeholder(id.to_string()),
                _ => PathSegment::Literal(raw.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            text: text.to_string(),
            segments,
        })
    }

    /// The original textual form.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True if any segment is a placeholder.
    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, PathSegment::Placeholder(_)))
    }

    /// True if this path contains the placeholder `%id%`.
    pub fn references(&self, id: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, PathSegment::Placeholder(p) if p == id))
    }

    /// The layer ids referenced by placeholders, in path order.
    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            PathSegment::Placeholder(id) => Some(id.as_str()),
            PathSegment::Literal(_) => None,
        })
    }

    /// Expand placeholders against `layers` into one concrete cascading
    /// candidate name.
    ///
    /// A placeholder whose layer is active substitutes the layer's
    /// captured value (most recent activation wins); an inactive one
    /// substitutes the literal wildcard marker, so entries stored under
    /// `%` still match.
    pub fn substitute(&self, layers: &LayerStack) -> EntryName {
        let segments: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Literal(text) => text.clone(),
                PathSegment::Placeholder(id) => layers
                    .lookup(id)
                    .unwrap_or(WILDCARD)
                    .to_string(),
            })
            .collect();
        EntryName::cascading(segments)
    }
}

impl fmt::Display for SpecPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl std::str::FromStr for SpecPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

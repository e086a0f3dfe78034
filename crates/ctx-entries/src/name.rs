//! Hierarchical, namespace-qualified entry names

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage namespace of an entry.
///
/// Cascading lookup tries namespaces in [`Namespace::CASCADE_ORDER`]:
/// the most specific override namespace first, ending at the
/// lowest-precedence default (`System`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Per-directory overrides (highest precedence)
    Dir,
    /// Per-user configuration
    User,
    /// System-wide defaults (lowest precedence)
    System,
}

impl Namespace {
    /// Fixed precedence order used by cascading lookup.
    pub const CASCADE_ORDER: [Namespace; 3] = [Namespace::Dir, Namespace::User, Namespace::System];

    /// The canonical lowercase qualifier used in textual names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Dir => "dir",
            Namespace::User => "user",
            Namespace::System => "system",
        }
    }

    /// Parse a namespace qualifier.
    pub fn parse(qualifier: &str) -> Result<Self> {
        match qualifier {
            "dir" => Ok(Namespace::Dir),
            "user" => Ok(Namespace::User),
            "system" => Ok(Namespace::System),
            other => Err(Error::UnknownNamespace {
                namespace: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hierarchical entry name: optional namespace plus ordered segments.
///
/// A name without a namespace is *cascading*: it does not address one
/// stored entry directly but is resolved through the namespace
/// precedence order. Textual forms:
///
/// - `user/act/%` — qualified, namespace `user`, segments `["act", "%"]`
/// - `/act/%` — cascading, segments `["act", "%"]`
///
/// Ordering is namespace-first, then segment-wise, so a sorted set of
/// names keeps every subtree contiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryName {
    namespace: Option<Namespace>,
    segments: Vec<String>,
}

impl EntryName {
    /// Parse a textual name.
    ///
    /// A leading `/` marks a cascading name; otherwise the first
    /// component must be a known namespace qualifier. Empty segments
    /// are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let (namespace, rest) = if let Some(stripped) = text.strip_prefix('/') {
            (None, stripped)
        } else {
            let (qualifier, rest) = text.split_once('/').ok_or_else(|| Error::InvalidName {
                name: text.to_string(),
                message: "expected at least one segment after the namespace".to_string(),
            })?;
            (Some(Namespace::parse(qualifier)?), rest)
        };

        if rest.is_empty() {
            return Err(Error::InvalidName {
                name: text.to_string(),
                message: "name has no segments".to_string(),
            });
        }

        let segments: Vec<String> = rest.split('/').map(String::from).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::InvalidName {
                name: text.to_string(),
                message: "empty segment".to_string(),
            });
        }

        Ok(Self {
            namespace,
            segments,
        })
    }

    /// Build a cascading (namespace-free) name from segments.
    pub fn cascading(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            namespace: None,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a namespace-qualified name from segments.
    pub fn in_namespace(
        namespace: Namespace,
        segments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            namespace: Some(namespace),
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The namespace qualifier, if any.
    pub fn namespace(&self) -> Option<Namespace> {
        self.namespace
    }

    /// True if this name has no namespace qualifier.
    pub fn is_cascading(&self) -> bool {
        self.namespace.is_none()
    }

    /// The ordered name segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment (the entry's base name).
    pub fn base_name(&self) -> &str {
        // segments is non-empty by construction
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// The same segments re-qualified under `namespace`.
    pub fn with_namespace(&self, namespace: Namespace) -> Self {
        Self {
            namespace: Some(namespace),
            segments: self.segments.clone(),
        }
    }

    /// The same segments with the namespace stripped.
    pub fn to_cascading(&self) -> Self {
        Self {
            namespace: None,
            segments: self.segments.clone(),
        }
    }

    /// A child name with one extra segment appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self {
            namespace: self.namespace,
            segments,
        }
    }

    /// The parent name, or `None` for a single-segment name.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            namespace: self.namespace,
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// True if `prefix` names this entry or one of its ancestors.
    ///
    /// Namespaces must match exactly (a cascading prefix only matches
    /// cascading names).
    pub fn starts_with(&self, prefix: &EntryName) -> bool {
        self.namespace == prefix.namespace
            && self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Number of segments below `prefix`, if this name is inside its subtree.
    pub fn depth_below(&self, prefix: &EntryName) -> Option<usize> {
        if self.starts_with(prefix) {
            Some(self.segments.len() - prefix.segments.len())
        } else {
            None
        }
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.segments.join("/")),
            None => write!(f, "/{}", self.segments.join("/")),
        }
    }
}

impl std::str::FromStr for EntryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parse_qualified_name() {
        let name = EntryName::parse("user/act/%").unwrap();
        assert_eq!(name.namespace(), Some(Namespace::User));
        assert_eq!(name.segments(), ["act", "%"]);
        assert_eq!(name.to_string(), "user/act/%");
    }

    #[test]
    fn parse_cascading_name() {
        let name = EntryName::parse("/hello").unwrap();
        assert!(name.is_cascading());
        assert_eq!(name.segments(), ["hello"]);
        assert_eq!(name.to_string(), "/hello");
    }

    #[rstest]
    #[case("")]
    #[case("user/")]
    #[case("user")]
    #[case("/a//b")]
    fn parse_rejects_malformed_names(#[case] text: &str) {
        assert!(EntryName::parse(text).is_err());
    }

    #[test]
    fn parse_rejects_unknown_namespace() {
        let err = EntryName::parse("cloud/hello").unwrap_err();
        assert!(matches!(err, Error::UnknownNamespace { .. }));
    }

    #[test]
    fn with_namespace_requalifies_cascading_name() {
        let cascading = EntryName::parse("/act/active").unwrap();
        let user = cascading.with_namespace(Namespace::User);
        assert_eq!(user.to_string(), "user/act/active");
        assert_eq!(user.to_cascading(), cascading);
    }

    #[test]
    fn starts_with_requires_matching_namespace() {
        let name = EntryName::parse("user/act/active").unwrap();
        assert!(name.starts_with(&EntryName::parse("user/act").unwrap()));
        assert!(!name.starts_with(&EntryName::parse("/act").unwrap()));
        assert!(!name.starts_with(&EntryName::parse("system/act").unwrap()));
    }

    #[test]
    fn depth_below_counts_extra_segments() {
        let prefix = EntryName::parse("user/preload/open").unwrap();
        let child = prefix.child("etc-hosts");
        let grandchild = child.child("readonly");
        assert_eq!(child.depth_below(&prefix), Some(1));
        assert_eq!(grandchild.depth_below(&prefix), Some(2));
        assert_eq!(prefix.depth_below(&child), None);
    }

    proptest::proptest! {
        // Canonical text form and parse are inverses for valid names.
        #[test]
        fn textual_form_round_trips(
            segments in proptest::collection::vec("[a-z%][a-z0-9%]{0,6}", 1..4)
        ) {
            let name = EntryName::in_namespace(Namespace::User, segments);
            let reparsed = EntryName::parse(&name.to_string()).unwrap();
            proptest::prop_assert_eq!(reparsed, name);
        }
    }

    #[test]
    fn ordering_keeps_subtrees_contiguous() {
        let mut names = vec![
            EntryName::parse("user/b").unwrap(),
            EntryName::parse("user/a/x").unwrap(),
            EntryName::parse("user/a").unwrap(),
            EntryName::parse("system/a").unwrap(),
        ];
        names.sort();
        let rendered: Vec<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["user/a", "user/a/x", "user/b", "system/a"]);
    }
}

//! Static file-open redirect tables
//!
//! The interception shim reads one dedicated subtree of an entry set at
//! process start and builds an immutable table mapping source paths to
//! replacement paths. Layout under the configured prefix:
//!
//! ```text
//! user/preload/open/etc/hosts            = "/tmp/hosts"
//! user/preload/open/etc/hosts/readonly   = "1"
//! ```
//!
//! A source path is spelled as nested segments below the prefix; the
//! entry's value is the replacement path. A child entry named
//! `readonly` under a redirect row marks the redirect read-only (the
//! sibling-lookup contract). The table is static after construction —
//! later entry-set mutations are deliberately not observed.

use ctx_entries::{EntryName, EntrySet};
use std::collections::BTreeMap;

/// One path redirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Absolute source path being intercepted.
    pub source: String,
    /// Replacement path handed out instead.
    pub target: String,
    /// When set, writes through the redirect are refused.
    pub readonly: bool,
}

/// Immutable source-path → redirect lookup table.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    redirects: BTreeMap<String, Redirect>,
}

impl RedirectTable {
    /// Build the table from the subtree of `entries` rooted at `prefix`.
    ///
    /// Every valued entry below the prefix becomes a redirect, except
    /// `readonly` flag leaves attached to a redirect row above them.
    pub fn from_entries(entries: &EntrySet, prefix: &EntryName) -> Self {
        let mut redirects = BTreeMap::new();

        for entry in entries.subtree(prefix) {
            let name = entry.name();
            let Some(depth) = name.depth_below(prefix) else {
                continue;
            };
            if depth == 0 {
                continue;
            }
            let Some(target) = entry.value() else {
                continue;
            };
            if is_readonly_flag(entries, prefix, name) {
                continue;
            }

            let source = format!("/{}", name.segments()[prefix.segments().len()..].join("/"));
            let readonly = entries
                .lookup(&name.child("readonly"))
                .and_then(|flag| flag.value())
                .is_some_and(|v| v == "1" || v == "true");

            redirects.insert(
                source.clone(),
                Redirect {
                    source,
                    target: target.to_string(),
                    readonly,
                },
            );
        }

        tracing::debug!(prefix = %prefix, count = redirects.len(), "built redirect table");
        Self { redirects }
    }

    /// Exact source-path lookup.
    pub fn lookup(&self, source: &str) -> Option<&Redirect> {
        self.redirects.get(source)
    }

    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }

    /// All redirects, ordered by source path.
    pub fn iter(&self) -> impl Iterator<Item = &Redirect> {
        self.redirects.values()
    }
}

/// A leaf named `readonly` is a flag, not a redirect, when the row it
/// hangs under is itself a valued redirect below the prefix.
fn is_readonly_flag(entries: &EntrySet, prefix: &EntryName, name: &EntryName) -> bool {
    if name.base_name() != "readonly" {
        return false;
    }
    let Some(parent) = name.parent() else {
        return false;
    };
    parent.depth_below(prefix).is_some_and(|d| d >= 1)
        && entries.lookup(&parent).is_some_and(|e| e.value().is_some())
}

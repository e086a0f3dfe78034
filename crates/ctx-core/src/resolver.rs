//! Spec-path resolution against an entry set
//!
//! Resolution is a pure function of the path, the active-layer stack
//! and the entry set: no hidden state, replayable, safe to call from
//! any number of threads against distinct contexts.

use crate::layer::LayerStack;
use crate::path::SpecPath;
use ctx_entries::{Entry, EntrySet};

/// Resolve `path` against `layers` and `entries`.
///
/// Placeholders are expanded into one concrete cascading candidate
/// (inactive layers substitute the `%` wildcard marker), which is then
/// looked up through the fixed namespace precedence order. Returns the
/// first matching entry, or `None` when nothing matches under any
/// namespace.
pub fn resolve<'a>(path: &SpecPath, layers: &LayerStack, entries: &'a EntrySet) -> Option<&'a Entry> {
    let candidate = path.substitute(layers);
    let hit = entries.lookup_cascading(&candidate);
    tracing::trace!(
        path = %path,
        candidate = %candidate,
        found = hit.is_some(),
        "resolved spec path"
    );
    hit
}

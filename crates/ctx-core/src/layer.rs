//! Context layers and the per-context active-layer stack

use std::collections::{BTreeMap, BTreeSet};

/// A named provider of a substitution string for spec-path placeholders.
///
/// Any type with an identity and a current value qualifies; consumers
/// define their own layer types (the set is open). The value is
/// evaluated once, at activation time — published snapshots carry plain
/// strings, so a peer adopting a snapshot never re-evaluates a foreign
/// accessor.
pub trait ContextLayer {
    /// Stable identity, referenced by `%id%` placeholders.
    fn id(&self) -> &str;

    /// Current substitution string for this layer.
    fn value(&self) -> String;
}

/// A layer with a fixed substitution value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticLayer {
    id: String,
    value: String,
}

impl StaticLayer {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

impl ContextLayer for StaticLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

/// One activation record: layer id plus the value captured when the
/// layer was activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRecord {
    pub id: String,
    pub value: String,
}

/// The flat exchange form of a layer stack, bottom to top.
pub type LayerSnapshot = Vec<(String, String)>;

/// An ordered stack of active layer records.
///
/// Duplicate activations of one id stack: the most recent record
/// shadows earlier ones for lookup, and deactivation pops records in
/// LIFO order per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerStack {
    records: Vec<LayerRecord>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The substitution value for `id`: the most recent activation wins.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.records
            .iter()
            .rev()
            .find(|r| r.id == id)
            .map(|r| r.value.as_str())
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    pub fn push(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.records.push(LayerRecord {
            id: id.into(),
            value: value.into(),
        });
    }

    /// Remove the most recent record for `id`, if any.
    pub fn remove_topmost(&mut self, id: &str) -> Option<LayerRecord> {
        let pos = self.records.iter().rposition(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }

    /// Flatten into the exchange form, bottom to top.
    pub fn snapshot(&self) -> LayerSnapshot {
        self.records
            .iter()
            .map(|r| (r.id.clone(), r.value.clone()))
            .collect()
    }

    pub fn from_snapshot(snapshot: LayerSnapshot) -> Self {
        Self {
            records: snapshot
                .into_iter()
                .map(|(id, value)| LayerRecord { id, value })
                .collect(),
        }
    }

    /// Effective substitution per id (shadowed records folded away).
    fn effective(&self) -> BTreeMap<&str, &str> {
        self.records
            .iter()
            .map(|r| (r.id.as_str(), r.value.as_str()))
            .collect()
    }

    /// Ids whose effective substitution differs between the two stacks,
    /// including ids present in only one of them.
    pub fn changed_ids(&self, other: &LayerStack) -> BTreeSet<String> {
        let before = self.effective();
        let after = other.effective();
        before
            .iter()
            .chain(after.iter())
            .filter(|(id, _)| before.get(*id) != after.get(*id))
            .map(|(id, _)| (*id).to_string())
            .collect()
    }
}

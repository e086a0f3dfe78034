//! A single configuration entry

use crate::name::EntryName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named configuration item: hierarchical name, optional value,
/// string metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    name: EntryName,
    value: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    meta: BTreeMap<String, String>,
}

impl Entry {
    /// Create an entry with a value.
    pub fn new(name: EntryName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(value.into()),
            meta: BTreeMap::new(),
        }
    }

    /// Create an entry without a value (a pure tree node).
    pub fn without_value(name: EntryName) -> Self {
        Self {
            name,
            value: None,
            meta: BTreeMap::new(),
        }
    }

    /// Attach a metadata key, builder-style.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &EntryName {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }

    /// Look up one metadata key.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// All metadata, in key order.
    pub fn meta_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.meta.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }
}

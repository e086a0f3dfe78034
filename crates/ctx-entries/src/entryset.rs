//! Ordered, name-unique entry containers

use crate::entry::Entry;
use crate::name::{EntryName, Namespace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An ordered set of entries, unique by full name.
///
/// Entries are kept in name-sorted order, which keeps every subtree
/// contiguous and makes prefix queries a range walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySet {
    entries: BTreeMap<EntryName, Entry>,
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, replacing any existing entry with the same name.
    ///
    /// Returns the replaced entry, if any.
    pub fn append(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.name().clone(), entry)
    }

    /// Exact-name lookup.
    pub fn lookup(&self, name: &EntryName) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Exact-name lookup, mutable.
    pub fn lookup_mut(&mut self, name: &EntryName) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    /// Cascading lookup.
    ///
    /// A qualified name is looked up exactly. A cascading name is tried
    /// under each namespace in [`Namespace::CASCADE_ORDER`]; the first
    /// match wins.
    pub fn lookup_cascading(&self, name: &EntryName) -> Option<&Entry> {
        if !name.is_cascading() {
            return self.lookup(name);
        }
        Namespace::CASCADE_ORDER
            .iter()
            .find_map(|ns| self.lookup(&name.with_namespace(*ns)))
    }

    /// Remove the subtree rooted at `prefix` (the prefix entry included)
    /// into a new set.
    pub fn cut(&mut self, prefix: &EntryName) -> EntrySet {
        let names: Vec<EntryName> = self
            .entries
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .map(|(name, _)| name.clone())
            .collect();

        let mut extracted = EntrySet::new();
        for name in names {
            if let Some(entry) = self.entries.remove(&name) {
                extracted.append(entry);
            }
        }
        tracing::trace!(prefix = %prefix, count = extracted.len(), "cut subtree");
        extracted
    }

    /// Merge another set in; its entries replace same-named entries here.
    pub fn merge(&mut self, other: EntrySet) {
        for (name, entry) in other.entries {
            self.entries.insert(name, entry);
        }
    }

    /// Direct children of `prefix` (exactly one segment deeper).
    pub fn children_of<'a>(&'a self, prefix: &'a EntryName) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .range(prefix.clone()..)
            .take_while(move |(name, _)| name.starts_with(prefix))
            .filter(move |(name, _)| name.depth_below(prefix) == Some(1))
            .map(|(_, entry)| entry)
    }

    /// All entries in the subtree rooted at `prefix`, the root included.
    pub fn subtree<'a>(&'a self, prefix: &'a EntryName) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .range(prefix.clone()..)
            .take_while(move |(name, _)| name.starts_with(prefix))
            .map(|(_, entry)| entry)
    }

    /// Iterate all entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }
}

impl FromIterator<Entry> for EntrySet {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut set = EntrySet::new();
        for entry in iter {
            set.append(entry);
        }
        set
    }
}

/// An entry set shared by reference across threads.
///
/// Readers proceed concurrently; a writer excludes everything else.
/// This makes the caller-synchronization contract explicit without
/// taking a lock inside cached binding reads, which never touch the
/// set. Visibility stays pull-based: a peer observes a committed write
/// only once it re-reads through the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedEntrySet {
    inner: Arc<RwLock<EntrySet>>,
}

impl SharedEntrySet {
    pub fn new(set: EntrySet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    /// Shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, EntrySet> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, EntrySet> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// True if both handles refer to the same underlying set.
    pub fn ptr_eq(&self, other: &SharedEntrySet) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<EntrySet> for SharedEntrySet {
    fn from(set: EntrySet) -> Self {
        Self::new(set)
    }
}

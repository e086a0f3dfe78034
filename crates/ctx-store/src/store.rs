//! The entry-store collaborator contract

use crate::error::Result;
use ctx_entries::EntrySet;

/// A durable backend that materializes and persists entry sets.
///
/// The contextual core consumes only the in-memory [`EntrySet`] a store
/// produces (plus `EntrySet::cut` to scope it); how entries are laid
/// out durably is the backend's concern.
pub trait EntryStore {
    /// Materialize the stored entries into an in-memory set.
    fn load(&mut self) -> Result<EntrySet>;

    /// Persist `set`, replacing the stored state.
    fn commit(&mut self, set: &EntrySet) -> Result<()>;
}

/// A store keeping its state in memory. Useful for tests and as the
/// backend for short-lived tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: EntrySet,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(state: EntrySet) -> Self {
        Self { state }
    }
}

impl EntryStore for MemoryStore {
    fn load(&mut self) -> Result<EntrySet> {
        Ok(self.state.clone())
    }

    fn commit(&mut self, set: &EntrySet) -> Result<()> {
        self.state = set.clone();
        Ok(())
    }
}

//! Cross-context coordination hub

use crate::layer::LayerSnapshot;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct HubState {
    snapshot: LayerSnapshot,
    version: u64,
}

/// Shared exchange point for active-layer snapshots.
///
/// Holds the last-published snapshot plus a monotonically increasing
/// version token, under one mutex. No resolution logic lives here;
/// contexts publish and fetch, and last-publish-wins decides the shared
/// truth. The hub is created as an `Arc` and outlives every context
/// registered to it.
#[derive(Debug, Default)]
pub struct CoordinationHub {
    state: Mutex<HubState>,
}

impl CoordinationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shared snapshot and bump the version token.
    ///
    /// Returns the new version.
    pub fn publish(&self, snapshot: LayerSnapshot) -> u64 {
        let mut state = self.lock();
        state.version += 1;
        state.snapshot = snapshot;
        tracing::debug!(version = state.version, layers = state.snapshot.len(), "hub publish");
        state.version
    }

    /// Read the current snapshot and its version.
    pub fn fetch(&self) -> (LayerSnapshot, u64) {
        let state = self.lock();
        (state.snapshot.clone(), state.version)
    }

    /// The current version token.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

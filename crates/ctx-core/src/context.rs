//! Per-thread execution contexts

use crate::binding::SharedSlot;
use crate::error::{Error, Result};
use crate::hub::CoordinationHub;
use crate::layer::{ContextLayer, LayerStack};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

type Callback = Box<dyn FnMut()>;

/// Per-thread state: the active-layer stack, the (de)activation
/// callback registry and the cache of live bindings.
///
/// A context is bound to exactly one [`CoordinationHub`] for its whole
/// lifetime and is owned by exactly one thread; the binding registry
/// uses `Rc`/`RefCell` internally, so a context is `!Send` by
/// construction.
///
/// Layer changes are local-first: `activate`/`deactivate` mutate this
/// context's stack, publish the new stack to the hub, and eagerly
/// re-resolve affected bindings. Peers observe nothing until they call
/// [`ExecutionContext::sync_layers`]; entry-set writes likewise become
/// visible to a peer only through its own [`ExecutionContext::update`].
pub struct ExecutionContext {
    hub: Arc<CoordinationHub>,
    seen_version: u64,
    layers: LayerStack,
    on_activate: HashMap<String, Callback>,
    on_deactivate: HashMap<String, Callback>,
    bindings: Vec<SharedSlot>,
}

impl ExecutionContext {
    /// Create a context registered to `hub`, adopting the hub's current
    /// snapshot as the initial local stack.
    pub fn new(hub: Arc<CoordinationHub>) -> Self {
        let (snapshot, version) = hub.fetch();
        Self {
            hub,
            seen_version: version,
            layers: LayerStack::from_snapshot(snapshot),
            on_activate: HashMap::new(),
            on_deactivate: HashMap::new(),
            bindings: Vec::new(),
        }
    }

    /// The current local active-layer stack.
    pub fn active_layers(&self) -> &LayerStack {
        &self.layers
    }

    /// Register a callback invoked whenever the layer `id` is activated
    /// in this context. Install before activation; a later registration
    /// replaces an earlier one.
    pub fn on_layer_activation(&mut self, id: impl Into<String>, callback: impl FnMut() + 'static) {
        self.on_activate.insert(id.into(), Box::new(callback));
    }

    /// Register a callback invoked whenever the layer `id` is
    /// deactivated in this context.
    pub fn on_layer_deactivation(
        &mut self,
        id: impl Into<String>,
        callback: impl FnMut() + 'static,
    ) {
        self.on_deactivate.insert(id.into(), Box::new(callback));
    }

    /// Activate `layer`: capture its substitution value, push it on the
    /// local stack, fire the registered activation callback (if any),
    /// publish the stack to the hub and eagerly re-resolve every cached
    /// binding referencing the layer's id.
    ///
    /// Duplicate activation stacks: the new record shadows earlier ones
    /// until it is deactivated.
    pub fn activate(&mut self, layer: &impl ContextLayer) -> Result<()> {
        let id = layer.id().to_string();
        let value = layer.value();
        tracing::debug!(id = %id, value = %value, "activate layer");
        self.layers.push(id.clone(), value);
        if let Some(callback) = self.on_activate.get_mut(&id) {
            callback();
        }
        self.publish_local();
        let affected = BTreeSet::from([id]);
        self.refresh_bindings(Some(&affected))
    }

    /// Deactivate the most recent activation of `layer`.
    ///
    /// Fails with [`Error::LayerProtocol`] when the layer is not active
    /// in this context; a silent no-op would desynchronize the stack.
    pub fn deactivate(&mut self, layer: &impl ContextLayer) -> Result<()> {
        let id = layer.id();
        if self.layers.remove_topmost(id).is_none() {
            return Err(Error::LayerProtocol { id: id.to_string() });
        }
        tracing::debug!(id = %id, "deactivate layer");
        if let Some(callback) = self.on_deactivate.get_mut(id) {
            callback();
        }
        self.publish_local();
        let affected = BTreeSet::from([id.to_string()]);
        self.refresh_bindings(Some(&affected))
    }

    /// Re-resolve every cached binding against the current contents of
    /// its entry set, with the current local stack. Layer membership is
    /// untouched. This is the pull side of cross-thread write
    /// visibility.
    pub fn update(&mut self) -> Result<()> {
        self.refresh_bindings(None)
    }

    /// Reconcile the local stack with the hub.
    ///
    /// If the hub holds a newer snapshot than this context last
    /// observed, adopt it and re-resolve every binding referencing a
    /// layer id whose effective substitution changed. Otherwise publish
    /// the local stack, advancing the hub's version token.
    /// Last-publish-wins.
    pub fn sync_layers(&mut self) -> Result<()> {
        let (snapshot, version) = self.hub.fetch();
        if version > self.seen_version {
            let incoming = LayerStack::from_snapshot(snapshot);
            let changed = self.layers.changed_ids(&incoming);
            tracing::debug!(version, changed = changed.len(), "adopt hub snapshot");
            self.layers = incoming;
            self.seen_version = version;
            if changed.is_empty() {
                return Ok(());
            }
            self.refresh_bindings(Some(&changed))
        } else {
            self.publish_local();
            Ok(())
        }
    }

    pub(crate) fn register_binding(&mut self, slot: SharedSlot) {
        self.bindings.push(slot);
    }

    fn publish_local(&mut self) {
        self.seen_version = self.hub.publish(self.layers.snapshot());
    }

    /// Re-resolve cached bindings, dropping slots whose handles are
    /// gone. With `affected` set, only bindings whose spec path
    /// references one of the ids are touched. Every applicable binding
    /// is refreshed even when an earlier one fails; the first error is
    /// returned and the failed caches keep their previous values.
    fn refresh_bindings(&mut self, affected: Option<&BTreeSet<String>>) -> Result<()> {
        let layers = &self.layers;
        let mut first_err = None;
        self.bindings.retain(|weak| {
            let Some(slot) = weak.upgrade() else {
                return false;
            };
            let mut slot = slot.borrow_mut();
            let applies = match affected {
                None => true,
                Some(ids) => ids.iter().any(|id| slot.spec_path().references(id)),
            };
            if applies {
                if let Err(err) = slot.refresh(layers) {
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                }
            }
            true
        });
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

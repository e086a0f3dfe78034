//! Typed, cached, read/write binding handles

use crate::context::ExecutionContext;
use crate::error::{Error, Result};
use crate::layer::LayerStack;
use crate::path::SpecPath;
use crate::resolver;
use ctx_entries::{Entry, EntryName, Namespace, SharedEntrySet};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::{Rc, Weak};
use std::str::FromStr;

/// Type-erased view of a live binding, held weakly by the owning
/// context so it can re-resolve caches on layer changes and `update()`.
pub(crate) trait BindingSlot {
    fn spec_path(&self) -> &SpecPath;

    /// Re-resolve against the current entry set contents and `layers`.
    ///
    /// All-or-nothing: on error the cache keeps its previous value.
    fn refresh(&mut self, layers: &LayerStack) -> Result<()>;
}

pub(crate) type SharedSlot = Weak<RefCell<dyn BindingSlot>>;

struct Resolution<T> {
    value: T,
    write_name: EntryName,
}

/// Resolve the current value for a binding, or fall back to its default.
///
/// `write_name` is the concrete name a write would target: the matched
/// entry's full name, or — when falling back to the default — the
/// substituted candidate under the `user` namespace.
fn resolve_current<T>(
    entries: &SharedEntrySet,
    path: &SpecPath,
    layers: &LayerStack,
    default: Option<&T>,
) -> Result<Resolution<T>>
where
    T: FromStr + Clone,
    <T as FromStr>::Err: Display,
{
    let guard = entries.read();
    let raw = resolver::resolve(path, layers, &guard)
        .and_then(|entry| entry.value().map(|v| (entry.name().clone(), v.to_string())));
    drop(guard);

    match raw {
        Some((name, text)) => match text.parse::<T>() {
            Ok(value) => Ok(Resolution {
                value,
                write_name: name,
            }),
            Err(err) => Err(Error::TypeMismatch {
                path: path.to_string(),
                value: text,
                target: std::any::type_name::<T>().to_string(),
                message: err.to_string(),
            }),
        },
        None => match default {
            Some(value) => Ok(Resolution {
                value: value.clone(),
                write_name: path.substitute(layers).with_namespace(Namespace::User),
            }),
            None => Err(Error::Unresolved {
                path: path.to_string(),
            }),
        },
    }
}

#[derive(Debug)]
struct BindingState<T> {
    entries: SharedEntrySet,
    path: SpecPath,
    default: Option<T>,
    cached: T,
    write_name: EntryName,
}

impl<T> BindingSlot for BindingState<T>
where
    T: FromStr + Display + Clone + 'static,
    <T as FromStr>::Err: Display,
{
    fn spec_path(&self) -> &SpecPath {
        &self.path
    }

    fn refresh(&mut self, layers: &LayerStack) -> Result<()> {
        match resolve_current(&self.entries, &self.path, layers, self.default.as_ref()) {
            Ok(resolution) => {
                self.cached = resolution.value;
                self.write_name = resolution.write_name;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(path = %self.path, error = %err, "binding keeps previous value");
                Err(err)
            }
        }
    }
}

/// A cached, typed, read/write handle tying one spec path to a concrete
/// entry within one context.
///
/// Resolution is eager: at construction and whenever the owning context
/// activates or deactivates a layer, runs `update()`, or adopts a hub
/// snapshot through `sync_layers()`. Reads return the cached value in
/// O(1) and never take a lock. Writes go to the shared entry set at the
/// currently resolved concrete name and refresh only this binding's
/// cache; peers observe them after their own `update()`.
#[derive(Debug)]
pub struct ContextualBinding<T> {
    inner: Rc<RefCell<BindingState<T>>>,
}

impl<T> ContextualBinding<T>
where
    T: FromStr + Display + Clone + 'static,
    <T as FromStr>::Err: Display,
{
    /// Bind `path` within `context`, resolving immediately.
    ///
    /// Fails with [`Error::Unresolved`] when no entry matches, or
    /// [`Error::TypeMismatch`] when the matched value does not parse.
    pub fn new(
        entries: &SharedEntrySet,
        context: &mut ExecutionContext,
        path: SpecPath,
    ) -> Result<Self> {
        Self::build(entries, context, path, None)
    }

    /// Like [`ContextualBinding::new`], with a fallback value used when
    /// nothing matches.
    pub fn with_default(
        entries: &SharedEntrySet,
        context: &mut ExecutionContext,
        path: SpecPath,
        default: T,
    ) -> Result<Self> {
        Self::build(entries, context, path, Some(default))
    }

    fn build(
        entries: &SharedEntrySet,
        context: &mut ExecutionContext,
        path: SpecPath,
        default: Option<T>,
    ) -> Result<Self> {
        let resolution = resolve_current(entries, &path, context.active_layers(), default.as_ref())?;
        let inner = Rc::new(RefCell::new(BindingState {
            entries: entries.clone(),
            path,
            default,
            cached: resolution.value,
            write_name: resolution.write_name,
        }));
        let erased: Rc<RefCell<dyn BindingSlot>> = inner.clone();
        let slot: SharedSlot = Rc::downgrade(&erased);
        context.register_binding(slot);
        Ok(Self { inner })
    }

    /// The last cached value. Never resolves, never blocks.
    pub fn get(&self) -> T {
        self.inner.borrow().cached.clone()
    }

    /// Write `value` into the shared entry set at the currently resolved
    /// concrete name, creating the entry if absent, and refresh the
    /// local cache.
    ///
    /// Does not publish to the hub; other contexts observe the write
    /// once they call `update()`.
    pub fn set(&self, value: T) {
        let mut state = self.inner.borrow_mut();
        {
            let mut entries = state.entries.write();
            match entries.lookup_mut(&state.write_name) {
                Some(entry) => entry.set_value(value.to_string()),
                None => {
                    let name = state.write_name.clone();
                    entries.append(Entry::new(name, value.to_string()));
                }
            }
        }
        tracing::debug!(name = %state.write_name, "binding wrote entry");
        state.cached = value;
    }

    /// The immutable spec path this binding was created with.
    pub fn spec_path(&self) -> SpecPath {
        self.inner.borrow().path.clone()
    }

    /// The concrete entry name the binding currently reads from and
    /// writes to.
    pub fn resolved_name(&self) -> EntryName {
        self.inner.borrow().write_name.clone()
    }
}

//! Contextual binding core
//!
//! The coordination hub, per-thread execution contexts, the layer
//! activation protocol and the cascading spec-path resolver:
//!
//! - **Layers** ([`ContextLayer`], [`LayerStack`]): named substitution
//!   providers; activation captures the value and stacks it.
//! - **Resolution** ([`SpecPath`], [`resolver::resolve`]): pure
//!   placeholder expansion plus namespace-cascading lookup.
//! - **Contexts** ([`ExecutionContext`]): one per thread, holding the
//!   local stack, callbacks and cached bindings.
//! - **Hub** ([`CoordinationHub`]): the shared snapshot + version token
//!   contexts reconcile against; visibility is strictly pull-based.
//! - **Bindings** ([`ContextualBinding`]): typed read/write handles
//!   with O(1) cached reads.
//!
//! # Example
//!
//! ```
//! use ctx_core::{ContextualBinding, CoordinationHub, ExecutionContext, SpecPath, StaticLayer};
//! use ctx_entries::{Entry, EntryName, EntrySet, SharedEntrySet};
//! use std::sync::Arc;
//!
//! # fn main() -> ctx_core::Result<()> {
//! let mut set = EntrySet::new();
//! set.append(Entry::new(EntryName::parse("user/act/%")?, "10"));
//! set.append(Entry::new(EntryName::parse("user/act/active")?, "22"));
//! let entries = SharedEntrySet::new(set);
//!
//! let hub = Arc::new(CoordinationHub::new());
//! let mut ctx = ExecutionContext::new(hub);
//! let value = ContextualBinding::<i32>::new(&entries, &mut ctx, SpecPath::parse("/act/%activate%")?)?;
//! assert_eq!(value.get(), 10);
//!
//! ctx.activate(&StaticLayer::new("activate", "active"))?;
//! assert_eq!(value.get(), 22);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod context;
pub mod error;
pub mod hub;
pub mod layer;
pub mod logging;
pub mod path;
pub mod resolver;

pub use binding::ContextualBinding;
pub use context::ExecutionContext;
pub use error::{Error, Result};
pub use hub::CoordinationHub;
pub use layer::{ContextLayer, LayerRecord, LayerSnapshot, LayerStack, StaticLayer};
pub use path::{SpecPath, WILDCARD};
pub use resolver::resolve;

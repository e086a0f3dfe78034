//! Ordered, name-unique configuration entry sets
//!
//! Layer 0 of the context store: the data model everything else builds
//! on. An [`Entry`] is one named configuration item; an [`EntrySet`]
//! keeps entries unique by full name and sorted, so subtrees stay
//! contiguous and prefix queries are range walks. [`SharedEntrySet`]
//! is the cross-thread handle with an explicit read-write lock.

pub mod entry;
pub mod entryset;
pub mod error;
pub mod name;
pub mod visitor;

pub use entry::Entry;
pub use entryset::{EntrySet, SharedEntrySet};
pub use error::{Error, Result};
pub use name::{EntryName, Namespace};
pub use visitor::EntryVisitor;

//! Entry store backends
//!
//! The durable-storage collaborator: [`EntryStore`] materializes an
//! in-memory [`ctx_entries::EntrySet`] and persists it back. The
//! contextual core never talks to a backend directly; it only consumes
//! the loaded set.

pub mod error;
pub mod store;
pub mod toml_store;

pub use error::{Error, Result};
pub use store::{EntryStore, MemoryStore};
pub use toml_store::TomlStore;

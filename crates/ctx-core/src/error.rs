//! Error types for ctx-core

/// Result type for ctx-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ctx-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No entry matched the resolved path and no default was supplied
    #[error("No entry resolves for '{path}' and no default was supplied")]
    Unresolved { path: String },

    /// An entry value was present but did not parse as the target type
    #[error("Value '{value}' at '{path}' does not parse as {target}: {message}")]
    TypeMismatch {
        path: String,
        value: String,
        target: String,
        message: String,
    },

    /// Deactivation was requested for a layer that is not active
    #[error("Layer '{id}' is not active in this context")]
    LayerProtocol { id: String },

    /// Spec path text could not be parsed
    #[error("Invalid spec path '{path}': {message}")]
    InvalidSpecPath { path: String, message: String },

    /// Entry name error from ctx-entries
    #[error(transparent)]
    Entries(#[from] ctx_entries::Error),
}

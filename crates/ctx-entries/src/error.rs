//! Error types for ctx-entries

/// Result type for ctx-entries operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ctx-entries operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Entry name could not be parsed
    #[error("Invalid entry name '{name}': {message}")]
    InvalidName { name: String, message: String },

    /// Namespace qualifier is not one of the known namespaces
    #[error("Unknown namespace: {namespace}")]
    UnknownNamespace { namespace: String },
}

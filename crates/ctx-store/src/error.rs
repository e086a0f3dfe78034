//! Error types for ctx-store

use std::path::PathBuf;

/// Result type for ctx-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ctx-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure while reading or writing the backing file
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing document could not be parsed
    #[error("Failed to parse store document at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Backing document could not be serialized
    #[error("Failed to serialize store document: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Entry name error from ctx-entries
    #[error(transparent)]
    Entries(#[from] ctx_entries::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

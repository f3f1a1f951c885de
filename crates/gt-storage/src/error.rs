// error.rs — Error types for the storage backends.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing stored values.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The key cannot be used by this backend.
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

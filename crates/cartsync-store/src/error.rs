//! Storage error types.

use thiserror::Error;

/// Errors that can occur when reading or writing storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Key contains characters the backends cannot store.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Underlying I/O failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes are not valid UTF-8.
    #[error("Stored value for {0} is not valid UTF-8")]
    InvalidEncoding(String),

    /// Backend lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}

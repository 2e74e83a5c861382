//! Durable key-value string storage for cartsync.
//!
//! The cart is persisted as a single JSON string under one key, the same way a
//! browser page keeps it in `localStorage`. This crate provides the storage seam
//! and two backends:
//!
//! - [`MemoryStorage`] - process-local, for tests and ephemeral sessions
//! - [`FileStorage`] - one file per key inside a data directory
//!
//! # Example
//!
//! ```rust,ignore
//! use cartsync_store::{FileStorage, Storage};
//!
//! let storage = FileStorage::open("/var/lib/cartsync")?;
//! storage.set("cart", "[]")?;
//! assert_eq!(storage.get("cart")?.as_deref(), Some("[]"));
//! ```

mod error;
mod file;
mod memory;

use std::sync::Arc;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// A durable string store keyed by name.
///
/// Writers are expected to be single-threaded per key; concurrent writers to
/// the same key resolve as last-writer-wins.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// List all stored keys.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Check whether `key` holds a value.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}

/// Check that a key is usable by every backend.
///
/// Keys must be non-empty and made of ASCII letters, digits, `-`, `_`, `.` or `:`,
/// and must not start with a dot.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStorage, MemoryStorage, Storage, StorageError};
}

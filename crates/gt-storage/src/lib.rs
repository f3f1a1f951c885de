//! # gt-storage
//!
//! Key-value persistence for the goal tracker.
//!
//! The goal list lives in memory and is written out as a single serialized
//! blob under one fixed key. Backends implement [`KeyValueStore`] so the
//! store never cares where the blob ends up.
//!
//! ## Key components
//!
//! - [`KeyValueStore`] — the `get`/`set` contract.
//! - [`JsonFileStore`] — one file per key, replaced atomically on write.
//! - [`MemoryStore`] — in-process map for tests and throwaway sessions.

pub mod error;
pub mod file;
pub mod memory;

pub use error::StorageError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// A string-keyed, string-valued store.
///
/// Implementations must be safe to share across threads: the goal store
/// reads from the caller's thread and writes from a background writer.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Check that a key is usable as a file stem on every platform.
///
/// [`JsonFileStore`] applies this on every access. Callers that take a key
/// from user configuration can check it up front.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let well_formed = !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if well_formed {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

// file.rs — JsonFileStore: one file per key on local disk.
//
// Layout: `<store_dir>/<key>.json`. Every `set` writes a temp file in the
// same directory and renames it over the target, so a reader sees either
// the old blob or the new one, never a mix.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::StorageError;
use crate::{validate_key, KeyValueStore};

/// File-backed [`KeyValueStore`].
pub struct JsonFileStore {
    store_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a new store backed by the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(store_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let store_dir = store_dir.as_ref().to_path_buf();
        fs::create_dir_all(&store_dir).map_err(|source| StorageError::IoError {
            path: store_dir.clone(),
            source,
        })?;
        Ok(Self { store_dir })
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Path of the file holding `key`.
    pub fn key_file(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.store_dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_file(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|source| StorageError::IoError { path, source })?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_file(key)?;

        let mut tmp =
            NamedTempFile::new_in(&self.store_dir).map_err(|source| StorageError::IoError {
                path: self.store_dir.clone(),
                source,
            })?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|source| StorageError::IoError {
                path: tmp.path().to_path_buf(),
                source,
            })?;
        tmp.persist(&path).map_err(|e| StorageError::IoError {
            path: path.clone(),
            source: e.error,
        })?;

        tracing::debug!(key, bytes = value.len(), "wrote {}", path.display());
        Ok(())
    }
}

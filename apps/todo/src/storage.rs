//! File-backed key-value storage.
//!
//! The whole store is one JSON object mapping keys to string values, the
//! on-disk counterpart of a browser's local storage. A missing or empty file
//! is an empty store.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use todolist_core::storage::{KeyValueStorage, StorageError};

/// Key-value storage persisted to a single JSON file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a storage backed by the file at `path`
    ///
    /// Nothing is touched on disk until the first `set`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(error.into()),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&raw)?)
    }

    /// Replaces the file with `document`
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the target, so readers see either the old or the new
    /// document and never a partial one.
    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            },
            None => Path::new("."),
        };

        let raw = serde_json::to_string_pretty(document)?;
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(raw.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| StorageError::from(e.error))?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    /// Rewrites the file with `key` replaced
    ///
    /// An unreadable existing document is an error rather than being
    /// overwritten, so other keys are never lost.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)?;
        tracing::trace!(path = %self.path.display(), key, "Wrote storage document");
        Ok(())
    }
}

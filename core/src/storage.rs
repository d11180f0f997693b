//! Key-value storage trait and related types for local persistence.
//!
//! This module defines the abstraction behind a browser-style local storage
//! slot: string values addressed by well-known string keys, read and written
//! synchronously by a single writer.
//!
//! # Implementations
//!
//! - `FileStorage` (in the `todolist` crate): a JSON document on disk
//! - `InMemoryStorage` / `FailingStorage` (in `todolist-testing`): deterministic tests
//!
//! # Example
//!
//! ```no_run
//! use todolist_core::storage::{self, KeyValueStorage, StorageError};
//!
//! fn example<S: KeyValueStorage>(store: &S) -> Result<(), StorageError> {
//!     storage::save_json(store, "numbers", &vec![1, 2, 3])?;
//!     let numbers: Option<Vec<u32>> = storage::load_json(store, "numbers")?;
//!     assert_eq!(numbers, Some(vec![1, 2, 3]));
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Local key-value store abstraction.
///
/// Every `set` fully overwrites the previous value for that key (last write
/// wins, no versioning). Reading a key that was never written yields `None`.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc` and captured by effects.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// - `Io`: The backing medium could not be read
    /// - `Serialization`: The backing medium is not a valid store document
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing anything stored there before.
    ///
    /// # Errors
    ///
    /// - `Io`: The backing medium could not be written
    /// - `Serialization`: The store document could not be encoded
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value stored under `key`.
///
/// # Errors
///
/// Returns the storage error from `get`, or `Serialization` if the stored
/// text is not valid JSON for `T`.
pub fn load_json<S, T>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: KeyValueStorage + ?Sized,
    T: DeserializeOwned,
{
    storage
        .get(key)?
        .map(|raw| serde_json::from_str(&raw).map_err(StorageError::from))
        .transpose()
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `Serialization` if encoding fails, or the storage error from `set`.
pub fn save_json<S, T>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStorage + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStorage(Mutex<HashMap<String, String>>);

    impl KeyValueStorage for MapStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            let map = self
                .0
                .lock()
                .map_err(|e| StorageError::Io(e.to_string()))?;
            Ok(map.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut map = self
                .0
                .lock()
                .map_err(|e| StorageError::Io(e.to_string()))?;
            map.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn load_missing_key_is_none() {
        let storage = MapStorage::default();
        let loaded: Option<Vec<u32>> = load_json(&storage, "absent").unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn save_then_load() {
        let storage = MapStorage::default();
        save_json(&storage, "k", &vec!["a", "b"]).unwrap();
        let loaded: Option<Vec<String>> = load_json(&storage, "k").unwrap();
        assert_eq!(loaded, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn malformed_value_is_serialization_error() {
        let storage = MapStorage::default();
        storage.set("k", "{not json").unwrap();
        let result: Result<Option<Vec<u32>>, _> = load_json(&storage, "k");
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn io_error_display() {
        let error = StorageError::Io("disk full".to_string());
        assert_eq!(format!("{error}"), "I/O error: disk full");
    }
}

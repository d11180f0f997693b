//! # Todolist Testing
//!
//! Testing utilities and helpers for the todolist reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Property-based testing strategies
//! - Assertion helpers for reducer effects
//!
//! ## Example
//!
//! ```ignore
//! use todolist_testing::{InMemoryStorage, ReducerTest};
//!
//! let storage = InMemoryStorage::new();
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(TodoEnvironment::new(Arc::new(storage.clone()), "todos"))
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::Submit { name: "Alice".into(), email: "a@x.com".into() })
//!     .then_state(|state| assert_eq!(state.todos.len(), 1))
//!     .run();
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use todolist_core::storage::{KeyValueStorage, StorageError};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Arc, HashMap, KeyValueStorage, Mutex, StorageError};

    /// In-memory key-value storage for deterministic tests
    ///
    /// Clones share the same underlying map, so a test can hand one clone to
    /// the environment and inspect writes through another.
    ///
    /// # Example
    ///
    /// ```
    /// use todolist_testing::mocks::InMemoryStorage;
    /// use todolist_core::storage::KeyValueStorage;
    ///
    /// let storage = InMemoryStorage::new();
    /// let observer = storage.clone();
    /// storage.set("todos", "[]").unwrap();
    /// assert_eq!(observer.get("todos").unwrap(), Some("[]".to_string()));
    /// assert_eq!(observer.write_count(), 1);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryStorage {
        entries: Arc<Mutex<HashMap<String, String>>>,
        writes: Arc<Mutex<usize>>,
    }

    impl InMemoryStorage {
        /// Create an empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a storage with one pre-populated key
        #[must_use]
        pub fn with_entry(key: &str, value: &str) -> Self {
            let storage = Self::new();
            if let Ok(mut entries) = storage.entries.lock() {
                entries.insert(key.to_string(), value.to_string());
            }
            storage
        }

        /// Raw value stored under `key`, if any
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries
                .lock()
                .ok()
                .and_then(|entries| entries.get(key).cloned())
        }

        /// Number of successful `set` calls so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.lock().map_or(0, |writes| *writes)
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            let entries = self
                .entries
                .lock()
                .map_err(|e| StorageError::Io(format!("lock poisoned: {e}")))?;
            Ok(entries.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut entries = self
                .entries
                .lock()
                .map_err(|e| StorageError::Io(format!("lock poisoned: {e}")))?;
            entries.insert(key.to_string(), value.to_string());
            drop(entries);

            let mut writes = self
                .writes
                .lock()
                .map_err(|e| StorageError::Io(format!("lock poisoned: {e}")))?;
            *writes += 1;
            Ok(())
        }
    }

    /// Storage whose every operation fails with an I/O error
    #[derive(Debug, Clone)]
    pub struct FailingStorage {
        message: String,
    }

    impl FailingStorage {
        /// Create a failing storage reporting `message`
        #[must_use]
        pub fn new(message: impl Into<String>) -> Self {
            Self {
                message: message.into(),
            }
        }
    }

    impl Default for FailingStorage {
        fn default() -> Self {
            Self::new("storage unavailable")
        }
    }

    impl KeyValueStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(self.message.clone()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(self.message.clone()))
        }
    }
}

/// Property-based testing strategies
pub mod properties {
    use proptest::prelude::*;

    /// Text that is non-empty after trimming, optionally padded with spaces
    pub fn filled_text() -> impl Strategy<Value = String> {
        ("[ ]{0,2}", "[A-Za-z0-9@._-]{1,12}", "[ ]{0,2}")
            .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
    }

    /// Text that is empty after trimming
    pub fn blank_text() -> impl Strategy<Value = String> {
        "[ \t\n]{0,4}"
    }
}

// Re-export commonly used items
pub use mocks::{FailingStorage, InMemoryStorage};
pub use reducer_test::{assertions, ReducerTest};

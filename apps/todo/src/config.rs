//! Configuration management for the todo list.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use todolist_runtime::StoreConfig;

/// Key the collection is stored under when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Local storage configuration
    pub storage: StorageConfig,
    /// Store runtime configuration
    pub runtime: RuntimeConfig,
    /// Fallback log level (trace, debug, info, warn, error) used when
    /// `RUST_LOG` does not provide a filter
    pub log_level: String,
}

/// Local storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File backing the key-value store
    pub path: PathBuf,
    /// Key the collection is stored under
    pub key: String,
}

/// Store runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum effect-produced actions reduced per intent
    pub max_feedback_actions: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | variable | default |
    /// |---|---|
    /// | `TODOLIST_STORAGE_PATH` | `.todolist/storage.json` |
    /// | `TODOLIST_STORAGE_KEY` | `todos` |
    /// | `TODOLIST_MAX_FEEDBACK_ACTIONS` | `32` |
    /// | `TODOLIST_LOG` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            storage: StorageConfig {
                path: lookup("TODOLIST_STORAGE_PATH")
                    .map_or_else(|| PathBuf::from(".todolist/storage.json"), PathBuf::from),
                key: lookup("TODOLIST_STORAGE_KEY")
                    .filter(|key| !key.is_empty())
                    .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            },
            runtime: RuntimeConfig {
                max_feedback_actions: lookup("TODOLIST_MAX_FEEDBACK_ACTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(StoreConfig::default().max_feedback_actions),
            },
            log_level: lookup("TODOLIST_LOG")
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Store configuration derived from the runtime section
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.runtime.max_feedback_actions)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

//! Todo list manager with local persistence.
//!
//! A todo is a name and an email with two flags, `validated` and `archived`.
//! The collection is split into an active view and an archived view, shares
//! one pair of input fields between "add" and "edit", and is written to a
//! key-value storage slot after every mutation.
//!
//! - Domain model and actions in [`types`]
//! - Pure state transitions in [`TodoReducer`]
//! - A synchronous facade with one method per intent in [`TodoStore`]
//! - A JSON file backend in [`FileStorage`]
//! - A line-oriented terminal view in [`command`] and [`view`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todolist::{FileStorage, TodoEnvironment, TodoStore, View};
//! use todolist_runtime::StoreConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::new(Arc::new(FileStorage::new("todos.json")), "todos");
//! let mut store = TodoStore::open(env, StoreConfig::default())?;
//!
//! store.submit("Alice", "a@x.com")?;
//! store.validate(0)?;
//! store.toggle_archive(View::Active, 0)?;
//!
//! println!("Archived: {}", store.archived_view().len());
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod reducer;
pub mod storage;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use storage::FileStorage;
pub use store::TodoStore;
pub use types::{
    Draft, EditSession, Outcome, Rejection, Todo, TodoAction, TodoId, TodoState, View,
};

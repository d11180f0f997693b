//! The `TodoStore` facade.
//!
//! Wraps a runtime [`Store`] around [`TodoReducer`] and exposes one method per
//! user intent. Every method reports whether the intent was applied or
//! rejected; rejected intents never change the collection or storage.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Draft, EditSession, Outcome, Todo, TodoAction, TodoId, TodoState, View};
use todolist_runtime::{Store, StoreConfig, StoreError};

/// Todo list with persistence on every mutation
pub struct TodoStore {
    inner: Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>,
}

impl TodoStore {
    /// Creates an empty store; call [`TodoStore::hydrate`] to load persisted todos
    #[must_use]
    pub fn new(environment: TodoEnvironment) -> Self {
        Self::with_config(environment, StoreConfig::default())
    }

    /// Creates an empty store with a custom runtime configuration
    #[must_use]
    pub fn with_config(environment: TodoEnvironment, config: StoreConfig) -> Self {
        Self {
            inner: Store::with_config(TodoState::new(), TodoReducer::new(), environment, config),
        }
    }

    /// Creates a store and hydrates it from storage
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime rejects the hydration.
    pub fn open(environment: TodoEnvironment, config: StoreConfig) -> Result<Self, StoreError> {
        let mut store = Self::with_config(environment, config);
        store.hydrate()?;
        Ok(store)
    }

    fn dispatch(&mut self, action: TodoAction) -> Result<Outcome, StoreError> {
        self.inner.send(action)?;
        Ok(self
            .inner
            .state(|s| s.last_outcome.clone())
            .unwrap_or(Outcome::Applied))
    }

    /// Replaces the collection with the persisted one, if any
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn hydrate(&mut self) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::Hydrate)
    }

    /// Writes the whole collection to storage
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn persist(&mut self) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::Persist)
    }

    /// Adds a todo, or updates the one being edited
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn submit(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::Submit {
            name: name.into(),
            email: email.into(),
        })
    }

    /// Replaces the shared input fields
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn update_draft(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::UpdateDraft {
            name: name.into(),
            email: email.into(),
        })
    }

    /// Starts editing row `position` of the active view
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn begin_edit(&mut self, position: usize) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::BeginEdit { position })
    }

    /// Starts editing the todo with `id`
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn begin_edit_id(&mut self, id: TodoId) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::BeginEditById { id })
    }

    /// Abandons the open edit session
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn cancel_edit(&mut self) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::CancelEdit)
    }

    /// Deletes the todo with `id`
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn remove(&mut self, id: TodoId) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::Remove { id })
    }

    /// Validates row `position` of the active view
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn validate(&mut self, position: usize) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::Validate { position })
    }

    /// Validates the todo with `id`
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn validate_id(&mut self, id: TodoId) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::ValidateById { id })
    }

    /// Flips `archived` on row `position` of `view`
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn toggle_archive(&mut self, view: View, position: usize) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::ToggleArchive { view, position })
    }

    /// Flips `archived` on the todo with `id`
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the runtime feedback limit is exceeded.
    pub fn toggle_archive_id(&mut self, id: TodoId) -> Result<Outcome, StoreError> {
        self.dispatch(TodoAction::ToggleArchiveById { id })
    }

    /// Todos that are not archived, in collection order
    #[must_use]
    pub fn active_view(&self) -> Vec<Todo> {
        self.inner
            .state(|s| s.active_view().into_iter().cloned().collect())
    }

    /// Todos that are archived, in collection order
    #[must_use]
    pub fn archived_view(&self) -> Vec<Todo> {
        self.inner
            .state(|s| s.archived_view().into_iter().cloned().collect())
    }

    /// The whole collection
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.inner.state(|s| s.todos.clone())
    }

    /// Current contents of the shared input fields
    #[must_use]
    pub fn draft(&self) -> Draft {
        self.inner.state(|s| s.draft.clone())
    }

    /// The open edit session, if any
    #[must_use]
    pub fn edit_session(&self) -> Option<EditSession> {
        self.inner.state(|s| s.edit)
    }

    /// Last persistence failure, if any
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner.state(|s| s.last_error.clone())
    }

    /// Read state via a closure
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TodoState) -> T,
    {
        self.inner.state(f)
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("environment", self.inner.environment())
            .field("todos", &self.inner.state(TodoState::count))
            .finish_non_exhaustive()
    }
}

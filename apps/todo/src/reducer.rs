//! Reducer logic for the todo list.
//!
//! Intents are validated against the current state. A rejected intent leaves
//! the collection untouched and records why; an applied intent marked
//! `persist` returns an effect that writes the whole collection to storage.

use crate::types::{
    max_id, Draft, EditSession, Outcome, Rejection, Todo, TodoAction, TodoId, TodoState, View,
};
use std::sync::Arc;
use todolist_core::{
    effect::Effect,
    reducer::Reducer,
    smallvec,
    storage::{self, KeyValueStorage},
    SmallVec,
};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Local key-value store holding the persisted collection
    pub storage: Arc<dyn KeyValueStorage>,
    /// Key the collection is stored under
    pub storage_key: String,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, storage_key: impl Into<String>) -> Self {
        Self {
            storage,
            storage_key: storage_key.into(),
        }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Adds a todo, or replaces the one being edited
    ///
    /// An edit replaces the record outright: the id is kept, `validated` and
    /// `archived` go back to false.
    fn submit(state: &mut TodoState, name: String, email: String) -> Result<(), Rejection> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(Rejection::BlankField);
        }

        match state.edit.take() {
            None => {
                let Some(next) = state.last_id.checked_add(1) else {
                    return Err(Rejection::IdSpaceExhausted);
                };
                state.last_id = next;
                let id = TodoId::new(next);
                state.todos.push(Todo::new(id, name, email));
            },
            Some(session) => {
                let Some(slot) = state.todos.iter_mut().find(|todo| todo.id == session.id) else {
                    return Err(Rejection::EditTargetMissing(session.id));
                };
                *slot = Todo::new(session.id, name, email);
            },
        }

        state.draft.clear();
        Ok(())
    }

    fn begin_edit(state: &mut TodoState, id: TodoId) -> Result<(), Rejection> {
        let (view, position) = state.position_of(id).ok_or(Rejection::UnknownId(id))?;
        let todo = state.get(id).ok_or(Rejection::UnknownId(id))?;
        state.draft = Draft::new(todo.name.clone(), todo.email.clone());
        state.edit = Some(EditSession { id, view, position });
        Ok(())
    }

    fn todo_at(state: &mut TodoState, view: View, position: usize) -> Result<&mut Todo, Rejection> {
        let out_of_range = Rejection::PositionOutOfRange { view, position };
        let index = state
            .index_in_view(view, position)
            .ok_or_else(|| out_of_range.clone())?;
        state.todos.get_mut(index).ok_or(out_of_range)
    }

    fn todo_by_id(state: &mut TodoState, id: TodoId) -> Result<&mut Todo, Rejection> {
        state
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(Rejection::UnknownId(id))
    }

    /// Applies an intent to state
    fn apply_intent(state: &mut TodoState, action: TodoAction) -> Result<(), Rejection> {
        match action {
            TodoAction::Persist => Ok(()),
            TodoAction::Submit { name, email } => Self::submit(state, name, email),
            TodoAction::UpdateDraft { name, email } => {
                state.draft = Draft { name, email };
                Ok(())
            },
            TodoAction::BeginEdit { position } => {
                let id = Self::todo_at(state, View::Active, position)?.id;
                Self::begin_edit(state, id)
            },
            TodoAction::BeginEditById { id } => Self::begin_edit(state, id),
            TodoAction::CancelEdit => {
                state.edit = None;
                state.draft.clear();
                Ok(())
            },
            TodoAction::Remove { id } => {
                let index = state.index_of(id).ok_or(Rejection::UnknownId(id))?;
                state.todos.remove(index);
                Ok(())
            },
            TodoAction::Validate { position } => {
                Self::todo_at(state, View::Active, position)?.validated = true;
                Ok(())
            },
            TodoAction::ValidateById { id } => {
                Self::todo_by_id(state, id)?.validated = true;
                Ok(())
            },
            TodoAction::ToggleArchive { view, position } => {
                let todo = Self::todo_at(state, view, position)?;
                todo.archived = !todo.archived;
                Ok(())
            },
            TodoAction::ToggleArchiveById { id } => {
                let todo = Self::todo_by_id(state, id)?;
                todo.archived = !todo.archived;
                Ok(())
            },
            // Handled in `reduce`
            TodoAction::Hydrate
            | TodoAction::Hydrated { .. }
            | TodoAction::PersistFailed { .. } => Ok(()),
        }
    }

    /// Effect loading the persisted collection
    ///
    /// A missing or unreadable slot leaves the collection as it is.
    fn hydrate_effect(env: &TodoEnvironment) -> Effect<TodoAction> {
        let backend = Arc::clone(&env.storage);
        let key = env.storage_key.clone();

        Effect::run(move || match storage::load_json::<_, Vec<Todo>>(&*backend, &key) {
            Ok(Some(todos)) => {
                tracing::debug!(key = %key, count = todos.len(), "Loaded persisted todos");
                Some(TodoAction::Hydrated { todos })
            },
            Ok(None) => {
                tracing::debug!(key = %key, "No persisted todos found");
                None
            },
            Err(error) => {
                tracing::warn!(key = %key, %error, "Ignoring unreadable persisted todos");
                None
            },
        })
    }

    /// Effect writing a snapshot of the collection to storage
    fn persist_effect(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let backend = Arc::clone(&env.storage);
        let key = env.storage_key.clone();
        let snapshot = state.todos.clone();

        Effect::run(move || match storage::save_json(&*backend, &key, &snapshot) {
            Ok(()) => {
                tracing::debug!(key = %key, count = snapshot.len(), "Persisted todos");
                None
            },
            Err(error) => {
                tracing::error!(key = %key, %error, "Failed to persist todos");
                Some(TodoAction::PersistFailed {
                    error: error.to_string(),
                })
            },
        })
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::debug!(action = action.name(), "Reducing todo action");

        match action {
            // ========== Events ==========
            TodoAction::Hydrated { todos } => {
                state.last_id = state.last_id.max(max_id(&todos));
                state.todos = todos;
                SmallVec::new()
            },
            TodoAction::PersistFailed { error } => {
                state.last_error = Some(error);
                SmallVec::new()
            },

            // ========== Intents ==========
            TodoAction::Hydrate => {
                state.last_outcome = Some(Outcome::Applied);
                smallvec![Self::hydrate_effect(env)]
            },
            intent => {
                let persists = intent.persists();
                match Self::apply_intent(state, intent) {
                    Ok(()) => {
                        state.last_outcome = Some(Outcome::Applied);
                        if persists {
                            state.last_error = None;
                            smallvec![Self::persist_effect(state, env)]
                        } else {
                            SmallVec::new()
                        }
                    },
                    Err(rejection) => {
                        tracing::debug!(%rejection, "Intent rejected");
                        state.last_outcome = Some(Outcome::Rejected(rejection));
                        SmallVec::new()
                    },
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todolist_testing::{assertions, FailingStorage, InMemoryStorage, ReducerTest};

    const KEY: &str = "todos";

    fn create_test_env(storage: &InMemoryStorage) -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(storage.clone()), KEY)
    }

    fn todo(id: u64, name: &str) -> Todo {
        Todo::new(TodoId::new(id), name.to_string(), format!("{}@x.com", name.to_lowercase()))
    }

    fn state_with(todos: Vec<Todo>) -> TodoState {
        TodoState::from_todos(todos)
    }

    #[test]
    fn test_submit_adds_todo() {
        let storage = InMemoryStorage::new();
        let observer = storage.clone();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(TodoState::new())
            .when_action(TodoAction::Submit {
                name: "Alice".to_string(),
                email: "alice@x.com".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.last_id, 1);
                assert_eq!(state.todos[0], todo(1, "Alice"));
                assert_eq!(state.last_outcome, Some(Outcome::Applied));
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .then_feedback(move |actions| {
                assert!(actions.is_empty());
                let persisted: Vec<Todo> =
                    serde_json::from_str(&observer.raw(KEY).unwrap()).unwrap();
                assert_eq!(persisted, vec![todo(1, "Alice")]);
            })
            .run();
    }

    #[test]
    fn test_submit_rejected_when_ids_run_out() {
        let storage = InMemoryStorage::new();
        let last = todo(u64::MAX, "Last");

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![last.clone()]))
            .when_action(TodoAction::Submit {
                name: "B".to_string(),
                email: "b@x.com".to_string(),
            })
            .then_state(move |state| {
                assert_eq!(state.todos, vec![last]);
                assert_eq!(state.last_id, u64::MAX);
                assert_eq!(
                    state.last_outcome,
                    Some(Outcome::Rejected(Rejection::IdSpaceExhausted))
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_submit_blank_is_rejected() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![todo(1, "Alice")]))
            .when_action(TodoAction::Submit {
                name: "   ".to_string(),
                email: "x@x.com".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.todos, vec![todo(1, "Alice")]);
                assert_eq!(
                    state.last_outcome,
                    Some(Outcome::Rejected(Rejection::BlankField))
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_submit_keeps_untrimmed_values() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(TodoState::new())
            .when_action(TodoAction::Submit {
                name: " Bob ".to_string(),
                email: "bob@x.com".to_string(),
            })
            .then_state(|state| assert_eq!(state.todos[0].name, " Bob "))
            .run();
    }

    #[test]
    fn test_submit_during_edit_resets_flags() {
        let storage = InMemoryStorage::new();
        let mut original = todo(1, "A");
        original.validated = true;
        original.archived = true;

        let mut state = state_with(vec![original]);
        state.edit = Some(EditSession {
            id: TodoId::new(1),
            view: View::Archived,
            position: 0,
        });
        state.draft = Draft::new("A", "a@x.com");

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state)
            .when_action(TodoAction::Submit {
                name: "B".to_string(),
                email: "b@x.com".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.todos, vec![todo(1, "B")]);
                assert_eq!(state.last_id, 1);
                assert!(state.edit.is_none());
                assert_eq!(state.draft, Draft::default());
            })
            .then_effects(assertions::assert_has_run_effect)
            .run();
    }

    #[test]
    fn test_submit_for_removed_edit_target() {
        let storage = InMemoryStorage::new();
        let mut state = state_with(vec![todo(2, "Bob")]);
        state.edit = Some(EditSession {
            id: TodoId::new(1),
            view: View::Active,
            position: 0,
        });

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state)
            .when_action(TodoAction::Submit {
                name: "Z".to_string(),
                email: "z@x.com".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.todos, vec![todo(2, "Bob")]);
                assert!(state.edit.is_none());
                assert_eq!(
                    state.last_outcome,
                    Some(Outcome::Rejected(Rejection::EditTargetMissing(TodoId::new(1))))
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_begin_edit_uses_active_position() {
        let storage = InMemoryStorage::new();
        let mut archived = todo(1, "Archived");
        archived.archived = true;

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![archived, todo(2, "Bob")]))
            .when_action(TodoAction::BeginEdit { position: 0 })
            .then_state(|state| {
                assert_eq!(
                    state.edit,
                    Some(EditSession {
                        id: TodoId::new(2),
                        view: View::Active,
                        position: 0,
                    })
                );
                assert_eq!(state.draft, Draft::new("Bob", "bob@x.com"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_begin_edit_out_of_range() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![todo(1, "Alice")]))
            .when_action(TodoAction::BeginEdit { position: 3 })
            .then_state(|state| {
                assert!(state.edit.is_none());
                assert_eq!(
                    state.last_outcome,
                    Some(Outcome::Rejected(Rejection::PositionOutOfRange {
                        view: View::Active,
                        position: 3,
                    }))
                );
            })
            .run();
    }

    #[test]
    fn test_cancel_edit_clears_session_and_draft() {
        let storage = InMemoryStorage::new();
        let mut state = state_with(vec![todo(1, "Alice")]);
        state.edit = Some(EditSession {
            id: TodoId::new(1),
            view: View::Active,
            position: 0,
        });
        state.draft = Draft::new("Alice", "alice@x.com");

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state)
            .when_action(TodoAction::CancelEdit)
            .then_state(|state| {
                assert!(!state.is_editing());
                assert_eq!(state.draft, Draft::default());
                assert_eq!(state.todos, vec![todo(1, "Alice")]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_remove_keeps_edit_session() {
        let storage = InMemoryStorage::new();
        let mut state = state_with(vec![todo(1, "Alice"), todo(2, "Bob")]);
        state.edit = Some(EditSession {
            id: TodoId::new(1),
            view: View::Active,
            position: 0,
        });

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state)
            .when_action(TodoAction::Remove { id: TodoId::new(1) })
            .then_state(|state| {
                assert_eq!(state.todos, vec![todo(2, "Bob")]);
                assert!(state.is_editing());
            })
            .then_effects(assertions::assert_has_run_effect)
            .run();
    }

    #[test]
    fn test_remove_unknown_id_does_not_persist() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![todo(1, "Alice")]))
            .when_action(TodoAction::Remove { id: TodoId::new(5) })
            .then_state(|state| {
                assert_eq!(state.count(), 1);
                assert_eq!(
                    state.last_outcome,
                    Some(Outcome::Rejected(Rejection::UnknownId(TodoId::new(5))))
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_validate_active_position() {
        let storage = InMemoryStorage::new();
        let mut archived = todo(1, "Archived");
        archived.archived = true;

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![archived, todo(2, "Bob")]))
            .when_action(TodoAction::Validate { position: 0 })
            .then_state(|state| {
                assert!(!state.todos[0].validated);
                assert!(state.todos[1].validated);
            })
            .then_effects(assertions::assert_has_run_effect)
            .run();
    }

    #[test]
    fn test_toggle_archive_in_archived_view() {
        let storage = InMemoryStorage::new();
        let mut first = todo(1, "A");
        first.archived = true;
        let mut third = todo(3, "C");
        third.archived = true;

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![first, todo(2, "B"), third]))
            .when_action(TodoAction::ToggleArchive {
                view: View::Archived,
                position: 1,
            })
            .then_state(|state| {
                assert!(state.todos[0].archived);
                assert!(!state.todos[1].archived);
                assert!(!state.todos[2].archived);
            })
            .run();
    }

    #[test]
    fn test_toggle_archive_by_id() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![todo(1, "A")]))
            .when_action(TodoAction::ToggleArchiveById { id: TodoId::new(1) })
            .then_state(|state| assert!(state.todos[0].archived))
            .run();
    }

    #[test]
    fn test_update_draft_does_not_persist() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(TodoState::new())
            .when_action(TodoAction::UpdateDraft {
                name: "Al".to_string(),
                email: String::new(),
            })
            .then_state(|state| assert_eq!(state.draft, Draft::new("Al", "")))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_hydrate_loads_verbatim() {
        let stored = r#"[{"id":4,"name":"A","email":"a@x.com","validated":true,"archived":false}]"#;
        let storage = InMemoryStorage::with_entry(KEY, stored);

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(TodoState::new())
            .when_action(TodoAction::Hydrate)
            .then_state(|state| assert!(state.todos.is_empty()))
            .then_feedback(|actions| {
                let mut expected = todo(4, "A");
                expected.validated = true;
                assert_eq!(actions, [TodoAction::Hydrated { todos: vec![expected] }]);
            })
            .run();
    }

    #[test]
    fn test_hydrate_missing_or_malformed_produces_nothing() {
        for storage in [InMemoryStorage::new(), InMemoryStorage::with_entry(KEY, "{oops")] {
            ReducerTest::new(TodoReducer::new())
                .with_env(create_test_env(&storage))
                .given_state(TodoState::new())
                .when_action(TodoAction::Hydrate)
                .then_feedback(|actions| assert!(actions.is_empty()))
                .run();
        }
    }

    #[test]
    fn test_hydrated_advances_counter_without_persisting() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(TodoState::new())
            .when_action(TodoAction::Hydrated {
                todos: vec![todo(9, "A"), todo(2, "B")],
            })
            .then_state(|state| {
                assert_eq!(state.count(), 2);
                assert_eq!(state.last_id, 9);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_persist_failure_feeds_back() {
        let env = TodoEnvironment::new(Arc::new(FailingStorage::new("disk full")), KEY);

        ReducerTest::new(TodoReducer::new())
            .with_env(env)
            .given_state(TodoState::new())
            .when_action(TodoAction::Persist)
            .then_feedback(|actions| {
                assert_eq!(
                    actions,
                    [TodoAction::PersistFailed {
                        error: "I/O error: disk full".to_string(),
                    }]
                );
            })
            .run();
    }

    #[test]
    fn test_next_persist_clears_last_error() {
        let storage = InMemoryStorage::new();
        let mut state = state_with(vec![todo(1, "A")]);
        state.last_error = Some("boom".to_string());

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state)
            .when_action(TodoAction::Persist)
            .then_state(|state| {
                assert_eq!(state.last_error, None);
            })
            .then_feedback(|actions| assert!(actions.is_empty()))
            .run();
    }

    #[test]
    fn test_persist_failed_records_error() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(create_test_env(&storage))
            .given_state(state_with(vec![todo(1, "A")]))
            .when_action(TodoAction::PersistFailed {
                error: "boom".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.last_error.as_deref(), Some("boom"));
                assert_eq!(state.count(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}

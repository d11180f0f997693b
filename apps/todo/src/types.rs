//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of entries (a name and an email) that
//! can be added, edited, validated, archived and removed. The collection is
//! split into two views by the `archived` flag.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use todolist_macros::Action;

/// Unique identifier for a todo item
///
/// Serialized as a bare number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
///
/// Field order matches the persisted JSON layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Display name
    pub name: String,
    /// Contact email (only checked for non-emptiness)
    pub email: String,
    /// Whether the todo was validated
    pub validated: bool,
    /// Whether the todo sits in the archived view
    pub archived: bool,
}

impl Todo {
    /// Creates a new, unvalidated and unarchived todo
    #[must_use]
    pub const fn new(id: TodoId, name: String, email: String) -> Self {
        Self {
            id,
            name,
            email,
            validated: false,
            archived: false,
        }
    }
}

/// One of the two filtered views of the collection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Todos with `archived == false`
    Active,
    /// Todos with `archived == true`
    Archived,
}

impl View {
    /// Whether `todo` belongs to this view
    #[must_use]
    pub const fn includes(self, todo: &Todo) -> bool {
        match self {
            Self::Active => !todo.archived,
            Self::Archived => todo.archived,
        }
    }

    /// The view a todo belongs to
    #[must_use]
    pub const fn of(todo: &Todo) -> Self {
        if todo.archived {
            Self::Archived
        } else {
            Self::Active
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Archived => f.write_str("archived"),
        }
    }
}

/// The shared name/email input pair feeding both add and update
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Staged name
    pub name: String,
    /// Staged email
    pub email: String,
}

impl Draft {
    /// Creates a draft from both fields
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Empties both fields
    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
    }
}

/// The todo currently being edited
///
/// The position is the row the edit was opened from; the id pins the target so
/// later mutations that shift rows cannot redirect the update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSession {
    /// Todo being edited
    pub id: TodoId,
    /// View the edit was opened from
    pub view: View,
    /// Row within `view` at the time the edit was opened
    pub position: usize,
}

/// Why an intent left the collection untouched
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Name or email is empty after trimming
    #[error("name and email must not be blank")]
    BlankField,

    /// No todo at this row of the view
    #[error("no {view} todo at position {position}")]
    PositionOutOfRange {
        /// View the position refers to
        view: View,
        /// Requested row
        position: usize,
    },

    /// No todo carries this id
    #[error("no todo with id {0}")]
    UnknownId(TodoId),

    /// The todo being edited was removed before the edit was submitted
    #[error("todo {0} being edited no longer exists")]
    EditTargetMissing(TodoId),

    /// Every id up to `u64::MAX` is taken
    #[error("no todo ids left")]
    IdSpaceExhausted,
}

/// Result of a user intent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The intent was applied
    Applied,
    /// The intent was a no-op
    Rejected(Rejection),
}

impl Outcome {
    /// Returns true if the intent was applied
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The rejection reason, if any
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// State of the todo list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All todos in insertion order
    pub todos: Vec<Todo>,
    /// Highest id handed out or loaded so far
    pub last_id: u64,
    /// Open edit session, if any
    pub edit: Option<EditSession>,
    /// Shared input fields
    pub draft: Draft,
    /// Outcome of the most recent intent
    pub last_outcome: Option<Outcome>,
    /// Last persistence failure (if any)
    pub last_error: Option<String>,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state holding `todos`, with the id counter past every loaded id
    #[must_use]
    pub fn from_todos(todos: Vec<Todo>) -> Self {
        let last_id = max_id(&todos);
        Self {
            todos,
            last_id,
            ..Self::default()
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Index of the todo with `id` in the underlying collection
    #[must_use]
    pub fn index_of(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    /// Index in the underlying collection of row `position` in `view`
    #[must_use]
    pub fn index_in_view(&self, view: View, position: usize) -> Option<usize> {
        self.todos
            .iter()
            .enumerate()
            .filter(|(_, todo)| view.includes(todo))
            .nth(position)
            .map(|(index, _)| index)
    }

    /// Row of the todo with `id` within its own view
    #[must_use]
    pub fn position_of(&self, id: TodoId) -> Option<(View, usize)> {
        let todo = self.get(id)?;
        let view = View::of(todo);
        self.view(view)
            .iter()
            .position(|candidate| candidate.id == id)
            .map(|position| (view, position))
    }

    /// Todos in `view`, in collection order
    #[must_use]
    pub fn view(&self, view: View) -> Vec<&Todo> {
        self.todos.iter().filter(|todo| view.includes(todo)).collect()
    }

    /// Todos that are not archived
    #[must_use]
    pub fn active_view(&self) -> Vec<&Todo> {
        self.view(View::Active)
    }

    /// Todos that are archived
    #[must_use]
    pub fn archived_view(&self) -> Vec<&Todo> {
        self.view(View::Archived)
    }

    /// Whether an edit session is open
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.edit.is_some()
    }
}

/// Largest id in `todos`, or 0 when empty
#[must_use]
pub fn max_id(todos: &[Todo]) -> u64 {
    todos.iter().map(|todo| todo.id.value()).max().unwrap_or(0)
}

/// Actions representing user intents and internal events for todos
///
/// Intents marked `persist` are followed by a write of the whole collection
/// to storage when they are applied.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Intents ==========
    /// Intent: Load the persisted collection
    #[intent]
    Hydrate,

    /// Intent: Write the collection to storage
    #[intent(persist)]
    Persist,

    /// Intent: Add a todo, or update the one being edited
    #[intent(persist)]
    Submit {
        /// Name field
        name: String,
        /// Email field
        email: String,
    },

    /// Intent: Replace the shared input fields
    #[intent]
    UpdateDraft {
        /// Name field
        name: String,
        /// Email field
        email: String,
    },

    /// Intent: Start editing the active todo at `position`
    #[intent]
    BeginEdit {
        /// Row in the active view
        position: usize,
    },

    /// Intent: Start editing the todo with `id`
    #[intent]
    BeginEditById {
        /// Todo to edit
        id: TodoId,
    },

    /// Intent: Abandon the open edit session
    #[intent]
    CancelEdit,

    /// Intent: Delete a todo
    #[intent(persist)]
    Remove {
        /// Todo to delete
        id: TodoId,
    },

    /// Intent: Validate the active todo at `position`
    #[intent(persist)]
    Validate {
        /// Row in the active view
        position: usize,
    },

    /// Intent: Validate the todo with `id`
    #[intent(persist)]
    ValidateById {
        /// Todo to validate
        id: TodoId,
    },

    /// Intent: Flip `archived` on the todo at `position` within `view`
    #[intent(persist)]
    ToggleArchive {
        /// View the row belongs to
        view: View,
        /// Row in `view`
        position: usize,
    },

    /// Intent: Flip `archived` on the todo with `id`
    #[intent(persist)]
    ToggleArchiveById {
        /// Todo to toggle
        id: TodoId,
    },

    // ========== Events ==========
    /// Event: Persisted collection was loaded
    #[event]
    Hydrated {
        /// Loaded todos, verbatim
        todos: Vec<Todo>,
    },

    /// Event: Writing the collection to storage failed
    #[event]
    PersistFailed {
        /// Error message
        error: String,
    },
}

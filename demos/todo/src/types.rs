//! Domain types for the to-do list.
//!
//! Actions keep the wire shape the list has always used:
//! `{"type": "ADD_TODO", "id": 0, "text": "milk"}`. Any `type` tag the list
//! does not know decodes to [`TodoAction::Unknown`], which every reducer
//! ignores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a todo, handed out by an `IdGenerator`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing
    pub text: String,
    /// Whether it has been done
    pub completed: bool,
}

impl Todo {
    /// A fresh, not yet completed todo
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Which todos the list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityFilter {
    /// Every todo
    #[default]
    ShowAll,
    /// Todos not completed yet
    ShowActive,
    /// Completed todos
    ShowCompleted,
}

impl VisibilityFilter {
    /// All filters, in the order the footer lists them
    pub const ALL: [Self; 3] = [Self::ShowAll, Self::ShowActive, Self::ShowCompleted];

    /// Footer label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShowAll => "All",
            Self::ShowActive => "Active",
            Self::ShowCompleted => "Completed",
        }
    }
}

/// Actions understood by the to-do reducers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Append a new todo
    AddTodo {
        /// Id drawn from the id generator
        id: TodoId,
        /// Todo text
        text: String,
    },
    /// Flip `completed` on the todo with this id
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },
    /// Change which todos are shown
    SetVisibilityFilter {
        /// New filter
        filter: VisibilityFilter,
    },
    /// Any other action type; leaves state unchanged
    #[serde(other)]
    Unknown,
}

impl TodoAction {
    /// `ADD_TODO` helper
    #[must_use]
    pub fn add(id: u64, text: impl Into<String>) -> Self {
        Self::AddTodo {
            id: TodoId(id),
            text: text.into(),
        }
    }

    /// `TOGGLE_TODO` helper
    #[must_use]
    pub const fn toggle(id: u64) -> Self {
        Self::ToggleTodo { id: TodoId(id) }
    }

    /// `SET_VISIBILITY_FILTER` helper
    #[must_use]
    pub const fn filter(filter: VisibilityFilter) -> Self {
        Self::SetVisibilityFilter { filter }
    }

    /// The wire `type` tag, for logging
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddTodo { .. } => "ADD_TODO",
            Self::ToggleTodo { .. } => "TOGGLE_TODO",
            Self::SetVisibilityFilter { .. } => "SET_VISIBILITY_FILTER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Root state of the application
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Todos in insertion order
    pub todos: Vec<Todo>,
    /// Current filter
    pub visibility_filter: VisibilityFilter,
}

impl AppState {
    /// Looks up a todo by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }
}

//! Derived views of [`AppState`](crate::types::AppState).

use crate::types::{Todo, VisibilityFilter};

/// Todos shown under `filter`, in list order
#[must_use]
pub fn visible_todos(todos: &[Todo], filter: VisibilityFilter) -> Vec<&Todo> {
    match filter {
        VisibilityFilter::ShowAll => todos.iter().collect(),
        VisibilityFilter::ShowActive => todos.iter().filter(|t| !t.completed).collect(),
        VisibilityFilter::ShowCompleted => todos.iter().filter(|t| t.completed).collect(),
    }
}

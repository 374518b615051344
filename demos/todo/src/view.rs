//! Plain-text rendering of the to-do screen.
//!
//! The screen is the todo list followed by the footer:
//!
//! ```text
//! #0 buy milk
//! #1 ~~walk dog~~
//! Show: All, [Active], [Completed]
//! ```
//!
//! Completed todos are struck through. In the footer the current filter is
//! plain text and the others are bracketed as links.

use crate::selectors::visible_todos;
use crate::types::{AppState, Todo, VisibilityFilter};

/// Renders one footer link
#[must_use]
pub fn filter_link(filter: VisibilityFilter, current: VisibilityFilter) -> String {
    if filter == current {
        filter.label().to_string()
    } else {
        format!("[{}]", filter.label())
    }
}

/// Renders one list line
#[must_use]
pub fn todo_line(todo: &Todo) -> String {
    if todo.completed {
        format!("#{} ~~{}~~", todo.id, todo.text)
    } else {
        format!("#{} {}", todo.id, todo.text)
    }
}

/// Renders the list, one line per todo
#[must_use]
pub fn todo_list(todos: &[&Todo]) -> Vec<String> {
    todos.iter().map(|t| todo_line(t)).collect()
}

/// Renders the filter footer
#[must_use]
pub fn footer(current: VisibilityFilter) -> String {
    let links: Vec<String> = VisibilityFilter::ALL
        .into_iter()
        .map(|filter| filter_link(filter, current))
        .collect();
    format!("Show: {}", links.join(", "))
}

/// Renders the whole screen for `state`
#[must_use]
pub fn render(state: &AppState) -> String {
    let visible = visible_todos(&state.todos, state.visibility_filter);
    let mut lines = todo_list(&visible);
    lines.push(footer(state.visibility_filter));
    lines.join("\n")
}

//! Reducers for the to-do list.
//!
//! [`todo`] handles a single item, [`TodosReducer`] the list and
//! [`VisibilityFilterReducer`] the filter. [`app_reducer`] scopes the two
//! reducers onto [`AppState`] and combines them. None of them produce effects.

use crate::types::{AppState, Todo, TodoAction, VisibilityFilter};
use composable_todo_core::{
    SmallVec,
    composition::{CombinedReducer, combine_reducers, scope_reducer},
    effect::Effect,
    environment::{IdGenerator, MonotonicIdGenerator},
    reducer::Reducer,
};
use std::sync::Arc;

/// Environment dependencies for the to-do reducers
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of fresh todo ids
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Draws the next todo id
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.ids.next_id()
    }
}

impl Default for TodoEnvironment {
    fn default() -> Self {
        Self::new(Arc::new(MonotonicIdGenerator::new()))
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reduces a single todo.
///
/// `ADD_TODO` creates a fresh item regardless of `state`. `TOGGLE_TODO`
/// flips `completed` when the id matches and returns the input unchanged
/// otherwise. Everything else returns the input unchanged.
#[must_use]
pub fn todo(state: Option<&Todo>, action: &TodoAction) -> Option<Todo> {
    match action {
        TodoAction::AddTodo { id, text } => Some(Todo::new(*id, text.clone())),
        TodoAction::ToggleTodo { id } => state.map(|t| {
            if t.id == *id {
                Todo {
                    completed: !t.completed,
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        }),
        TodoAction::SetVisibilityFilter { .. } | TodoAction::Unknown => state.cloned(),
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodosReducer;

impl Reducer for TodosReducer {
    type State = Vec<Todo>;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::AddTodo { .. } => {
                if let Some(created) = todo(None, &action) {
                    state.push(created);
                }
            },
            TodoAction::ToggleTodo { .. } => {
                for item in state.iter_mut() {
                    if let Some(next) = todo(Some(item), &action) {
                        *item = next;
                    }
                }
            },
            TodoAction::SetVisibilityFilter { .. } | TodoAction::Unknown => {},
        }

        SmallVec::new()
    }
}

/// Reducer for the visibility filter
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibilityFilterReducer;

impl Reducer for VisibilityFilterReducer {
    type State = VisibilityFilter;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if let TodoAction::SetVisibilityFilter { filter } = action {
            *state = filter;
        }

        SmallVec::new()
    }
}

/// Root reducer type
pub type AppReducer = CombinedReducer<AppState, TodoAction, TodoEnvironment>;

/// Builds the root reducer: todos first, then the visibility filter
#[must_use]
pub fn app_reducer() -> AppReducer {
    combine_reducers(vec![
        Box::new(scope_reducer(
            TodosReducer,
            |s: &AppState| &s.todos,
            |s: &mut AppState, todos: Vec<Todo>| s.todos = todos,
        )),
        Box::new(scope_reducer(
            VisibilityFilterReducer,
            |s: &AppState| &s.visibility_filter,
            |s: &mut AppState, filter: VisibilityFilter| s.visibility_filter = filter,
        )),
    ])
}

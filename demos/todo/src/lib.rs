//! A Redux-style to-do list on the Composable Todo state container.
//!
//! Two reducers, one for the todo list and one for the visibility filter,
//! are scoped onto [`AppState`] and combined into [`app_reducer`]. A
//! [`TodoApp`] owns the store, draws ids from an injected generator and
//! re-renders a mounted view after every action.
//!
//! # Quick Start
//!
//! ```no_run
//! use todo::{Config, TodoApp, VisibilityFilter, view};
//!
//! # async fn example() -> Result<(), todo::AppError> {
//! let app = TodoApp::new(&Config::default());
//! app.mount(|state| println!("{}", view::render(state))).await;
//!
//! let milk = app.add_todo("buy milk").await?;
//! app.add_todo("walk dog").await?;
//! app.toggle_todo(milk).await?;
//! app.set_visibility_filter(VisibilityFilter::ShowActive).await?;
//!
//! assert_eq!(app.visible_todos().await.len(), 1);
//! app.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod reducer;
pub mod selectors;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use app::{AppError, TodoApp, TodoStore};
pub use cli::{Command, ParseCommandError};
pub use config::Config;
pub use reducer::{
    AppReducer, TodoEnvironment, TodosReducer, VisibilityFilterReducer, app_reducer, todo,
};
pub use selectors::visible_todos;
pub use types::{AppState, Todo, TodoAction, TodoId, VisibilityFilter};

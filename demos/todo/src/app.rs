//! The to-do application shell.
//!
//! [`TodoApp`] owns the store and hands out todo ids from the injected
//! generator, so nothing lives in module-level state.

use crate::cli::ParseCommandError;
use crate::config::Config;
use crate::reducer::{AppReducer, TodoEnvironment, app_reducer};
use crate::selectors::visible_todos;
use crate::types::{AppState, Todo, TodoAction, TodoId, VisibilityFilter};
use composable_todo_core::environment::{IdGenerator, MonotonicIdGenerator};
use composable_todo_runtime::{Store, StoreConfig, StoreError, SubscriptionId};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Metric: wire actions that failed to decode
pub const MALFORMED_ACTIONS: &str = "todo.actions.malformed";

/// Store type for the to-do list
pub type TodoStore = Store<AppState, TodoAction, TodoEnvironment, AppReducer>;

/// Errors surfaced by [`TodoApp`]
#[derive(Error, Debug)]
pub enum AppError {
    /// The store rejected the action or failed to shut down
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A CLI line could not be parsed
    #[error("invalid command: {0}")]
    Command(#[from] ParseCommandError),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `ADD_TODO` named an id some todo already has
    #[error("todo id {0} is already in use")]
    DuplicateId(TodoId),
}

/// The to-do list application
#[derive(Clone)]
pub struct TodoApp {
    store: TodoStore,
    /// Held from the id check of an `ADD_TODO` until it is applied
    adds: Arc<Mutex<()>>,
}

impl TodoApp {
    /// Builds the app from configuration: a monotonic id generator starting
    /// at `config.id_start` and a store sized by `config`
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let ids = Arc::new(MonotonicIdGenerator::starting_at(config.id_start));
        Self::with_id_generator(ids, config.store_config())
    }

    /// Builds the app around an explicit id generator
    #[must_use]
    pub fn with_id_generator(ids: Arc<dyn IdGenerator>, store_config: StoreConfig) -> Self {
        let store = Store::with_config(
            AppState::default(),
            app_reducer(),
            TodoEnvironment::new(ids),
            store_config,
        );
        Self {
            store,
            adds: Arc::new(Mutex::new(())),
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Adds a todo under a freshly drawn id
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] once the store is shutting down.
    pub async fn add_todo(&self, text: impl Into<String>) -> Result<TodoId, AppError> {
        let id = self.store.environment().next_id();
        self.dispatch(TodoAction::add(id, text)).await?;
        Ok(TodoId::new(id))
    }

    /// Toggles the todo with `id`; unknown ids are ignored by the reducer
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] once the store is shutting down.
    pub async fn toggle_todo(&self, id: TodoId) -> Result<(), AppError> {
        self.dispatch(TodoAction::ToggleTodo { id }).await
    }

    /// Changes which todos are shown
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] once the store is shutting down.
    pub async fn set_visibility_filter(&self, filter: VisibilityFilter) -> Result<(), AppError> {
        self.dispatch(TodoAction::filter(filter)).await
    }

    /// Dispatches an action through the root reducer
    ///
    /// Subscribers have been notified by the time this returns. An
    /// `ADD_TODO` carrying a caller-chosen id is checked against the list and
    /// the id is reserved with the generator, so [`TodoApp::add_todo`] never
    /// hands it out again.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateId`] for an `ADD_TODO` whose id is taken
    /// (the store is not touched) and [`AppError::Store`] once the store is
    /// shutting down.
    pub async fn dispatch(&self, action: TodoAction) -> Result<(), AppError> {
        tracing::debug!(action = action.kind(), "Dispatching action");

        let TodoAction::AddTodo { id, .. } = &action else {
            self.store.send(action).await?;
            return Ok(());
        };
        let id = *id;

        let _adding = self.adds.lock().await;
        if self.store.state(|s| s.get(id).is_some()).await {
            tracing::warn!(%id, "Rejected ADD_TODO: id already in use");
            return Err(AppError::DuplicateId(id));
        }
        self.store.environment().ids.reserve(id.get());
        self.store.send(action).await?;
        Ok(())
    }

    /// Decodes and dispatches a wire-shaped action
    ///
    /// Returns `Ok(false)` without touching the store when `raw` does not
    /// decode (bad JSON, missing fields, unknown filter) or adds a todo under
    /// an id that is already in use.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] once the store is shutting down.
    pub async fn dispatch_json(&self, raw: &str) -> Result<bool, AppError> {
        match serde_json::from_str::<TodoAction>(raw) {
            Ok(action) => match self.dispatch(action).await {
                Ok(()) => Ok(true),
                Err(AppError::DuplicateId(_)) => Ok(false),
                Err(error) => Err(error),
            },
            Err(error) => {
                tracing::warn!(%error, "Ignoring malformed action");
                metrics::counter!(MALFORMED_ACTIONS).increment(1);
                Ok(false)
            },
        }
    }

    /// Subscribes `renderer` to every state change and renders once now
    pub async fn mount<F>(&self, renderer: F) -> SubscriptionId
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let renderer = Arc::new(renderer);
        let subscribed = Arc::clone(&renderer);
        let id = self
            .store
            .subscribe(move |state: &AppState| subscribed(state))
            .await;

        self.store.state(|state| renderer(state)).await;
        tracing::debug!(subscription = %id, "Renderer mounted");
        id
    }

    /// Stops rendering to a previously mounted renderer
    pub async fn unmount(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id).await
    }

    /// The todos the current filter shows
    pub async fn visible_todos(&self) -> Vec<Todo> {
        self.store
            .state(|s| {
                visible_todos(&s.todos, s.visibility_filter)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .await
    }

    /// A copy of the current state
    pub async fn state(&self) -> AppState {
        self.store.snapshot().await
    }

    /// Stops accepting actions and waits for in-flight work
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the shutdown timeout expires.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.store.shutdown_gracefully().await?;
        Ok(())
    }
}

impl std::fmt::Debug for TodoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoApp")
            .field("config", self.store.config())
            .finish_non_exhaustive()
    }
}

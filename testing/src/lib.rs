//! # Composable Todo Testing
//!
//! Testing utilities and helpers for the Composable Todo state container.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given/When/Then harness for reducers
//! - [`assertions`]: Effect assertion helpers
//! - [`mocks`]: Deterministic environment implementations
//! - [`helpers`]: Test setup such as tracing initialisation
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_testing::{RecordingListener, ScriptedIdGenerator};
//!
//! #[tokio::test]
//! async fn renders_after_each_dispatch() {
//!     let renders = RecordingListener::new();
//!     let store = Store::new(AppState::default(), app_reducer(), env());
//!     store.subscribe(renders.listener(|s: &AppState| s.todos.len())).await;
//!
//!     store.send(add_todo(0, "milk")).await?;
//!     assert_eq!(renders.calls(), vec![1]);
//! }
//! ```


/// Mock implementations of Environment traits
pub mod mocks {
    use composable_todo_core::environment::IdGenerator;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Id generator that hands out a scripted sequence first
    ///
    /// Once the script runs out it continues counting up from one past the
    /// largest scripted id, so it still never repeats an id it produced.
    ///
    /// # Example
    ///
    /// ```
    /// use composable_todo_core::environment::IdGenerator;
    /// use composable_todo_testing::mocks::ScriptedIdGenerator;
    ///
    /// let ids = ScriptedIdGenerator::new([7, 3]);
    /// assert_eq!(ids.next_id(), 7);
    /// assert_eq!(ids.next_id(), 3);
    /// assert_eq!(ids.next_id(), 8);
    /// ```
    #[derive(Debug, Default)]
    pub struct ScriptedIdGenerator {
        script: Mutex<VecDeque<u64>>,
        fallback: AtomicU64,
    }

    impl ScriptedIdGenerator {
        /// Create a generator that yields `ids` in order
        #[must_use]
        pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
            let script: VecDeque<u64> = ids.into_iter().collect();
            let fallback = script.iter().max().map_or(0, |max| max.saturating_add(1));

            Self {
                script: Mutex::new(script),
                fallback: AtomicU64::new(fallback),
            }
        }

        /// Scripted ids not handed out yet
        #[must_use]
        pub fn remaining(&self) -> usize {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    impl IdGenerator for ScriptedIdGenerator {
        fn next_id(&self) -> u64 {
            let scripted = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();

            scripted.unwrap_or_else(|| self.fallback.fetch_add(1, Ordering::SeqCst))
        }

        fn reserve(&self, id: u64) {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|scripted| *scripted != id);
            self.fallback.fetch_max(id.saturating_add(1), Ordering::SeqCst);
        }
    }

    /// Records a projection of every state a store notifies it with
    ///
    /// Clones share the same recording, so one clone can be moved into the
    /// store while the test keeps the other.
    #[derive(Debug)]
    pub struct RecordingListener<T> {
        calls: Arc<Mutex<Vec<T>>>,
    }

    impl<T> Clone for RecordingListener<T> {
        fn clone(&self) -> Self {
            Self {
                calls: Arc::clone(&self.calls),
            }
        }
    }

    impl<T> Default for RecordingListener<T> {
        fn default() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl<T> RecordingListener<T>
    where
        T: Clone + Send + 'static,
    {
        /// Create an empty recording
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Build a listener that records `project(state)` on every call
        pub fn listener<S, F>(&self, project: F) -> impl Fn(&S) + Send + Sync + 'static
        where
            F: Fn(&S) -> T + Send + Sync + 'static,
        {
            let calls = Arc::clone(&self.calls);
            move |state: &S| {
                let value = project(state);
                calls
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(value);
            }
        }

        /// Everything recorded so far, oldest first
        #[must_use]
        pub fn calls(&self) -> Vec<T> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of recorded calls
        #[must_use]
        pub fn len(&self) -> usize {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether nothing was recorded
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// The most recent recording
        #[must_use]
        pub fn last(&self) -> Option<T> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Output goes through the test harness writer so it only shows for
    /// failing tests. Honors `RUST_LOG`, defaulting to `warn`. Calling it
    /// again (from another test) is a no-op.
    pub fn init_test_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{RecordingListener, ScriptedIdGenerator};
pub use reducer_test::{ReducerTest, assertions};

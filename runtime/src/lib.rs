//! # Composable Todo Runtime
//!
//! The Store runtime that owns state, runs the reducer for every dispatched
//! action, notifies subscribers and executes effects.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer and environment; no global instance
//! - **Subscribers**: Listeners called with the post-action state after every dispatch
//! - **Action observers**: Broadcast receivers that see every processed action
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let id = store.subscribe(|state| render(state)).await;
//! store.send(Action::DoSomething).await?;
//!
//! let value = store.state(|s| s.some_field).await;
//! store.unsubscribe(id).await;
//! ```

use composable_todo_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Metric names and descriptions
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// Returned when `send()` is called after shutdown was initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Waiting on an effect handle timed out
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use composable_todo_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(256)
///     .with_shutdown_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.broadcast_capacity, 256);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of actions buffered for each action observer
    pub broadcast_capacity: usize,
    /// Timeout used by [`Store::shutdown_gracefully`]
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    ///
    /// A zero broadcast capacity is raised to 1.
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity: if broadcast_capacity == 0 { 1 } else { broadcast_capacity },
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity (zero is raised to 1)
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = if capacity == 0 { 1 } else { capacity };
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action. Actions fed back by those effects get their own handles and
/// are not tracked here.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle and the tracking half used during effect execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (_tx, rx) = watch::channel(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of tracked effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, nothing can still be running
                break;
            }
        }
    }

    /// Wait for all tracked effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all
    /// effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Runs even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicU64, AtomicUsize, DecrementGuard, Duration,
        Effect, EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreConfig, StoreError,
        watch,
    };
    use crate::metrics::{
        COMMANDS_TOTAL, EFFECTS_COUNT, EFFECTS_EXECUTED, REDUCER_DURATION, REJECTED_ACTIONS,
        SHUTDOWN, SUBSCRIBERS_NOTIFIED,
    };
    use tokio::sync::broadcast;

    type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

    /// Identifies one `subscribe` registration
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct SubscriptionId(u64);

    impl std::fmt::Display for SubscriptionId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "sub-{}", self.0)
        }
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer and environment
    /// 3. Subscribers notified after every dispatch
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a Store yields another handle to the same state and subscribers.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        listeners: Arc<RwLock<Vec<(SubscriptionId, Listener<S>)>>>,
        next_subscription: Arc<AtomicU64>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Every action processed by `send`, in processing order.
        action_broadcast: broadcast::Sender<A>,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                listeners: Arc::new(RwLock::new(Vec::new())),
                next_subscription: Arc::new(AtomicU64::new(0)),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
                config,
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// The injected environment
        #[must_use]
        pub fn environment(&self) -> &E {
            &self.environment
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state and runs the reducer
        /// 2. Downgrades to a read lock and calls every subscriber, in
        ///    subscription order, with the post-action state
        /// 3. Broadcasts the action to action observers
        /// 4. Starts the returned effects and returns their handle
        ///
        /// Concurrent `send()` calls serialize at the reducer, and each
        /// notification sees exactly the state its own action produced.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// A panicking reducer or subscriber propagates to the caller.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                ::metrics::counter!(REJECTED_ACTIONS).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            ::metrics::counter!(COMMANDS_TOTAL).increment(1);

            let (handle, tracking) = EffectHandle::new();
            let observed = action.clone();

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let effects = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &*self.environment);
                ::metrics::histogram!(REDUCER_DURATION).record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                // Note: Precision loss acceptable for metrics (effect counts < 2^52)
                #[allow(clippy::cast_precision_loss)]
                ::metrics::histogram!(EFFECTS_COUNT).record(effects.len() as f64);

                effects
            };

            let state = state.downgrade();
            self.notify_listeners(&*state).await;
            drop(state);

            // No receivers is not an error: observers are optional
            let _ = self.action_broadcast.send(observed);

            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }
            tracing::debug!("Action processing completed");

            Ok(handle)
        }

        async fn notify_listeners(&self, state: &S) {
            let listeners = self.listeners.read().await;

            for (id, listener) in listeners.iter() {
                tracing::trace!(subscription = %id, "Notifying subscriber");
                listener(state);
            }

            ::metrics::counter!(SUBSCRIBERS_NOTIFIED).increment(listeners.len() as u64);
        }

        /// Register a listener called after every dispatched action
        ///
        /// The listener receives the state as it is right after the reducer
        /// ran. It is not called at subscription time. Listeners must not
        /// block; they run while the state read lock is held.
        pub async fn subscribe<F>(&self, listener: F) -> SubscriptionId
        where
            F: Fn(&S) + Send + Sync + 'static,
        {
            let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
            self.listeners.write().await.push((id, Arc::new(listener)));
            tracing::debug!(subscription = %id, "Subscriber registered");
            id
        }

        /// Remove a listener
        ///
        /// Returns `false` if the id was not (or no longer) registered.
        pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
            let mut listeners = self.listeners.write().await;
            let before = listeners.len();
            listeners.retain(|(existing, _)| *existing != id);
            let removed = listeners.len() != before;
            if removed {
                tracing::debug!(subscription = %id, "Subscriber removed");
            }
            removed
        }

        /// Number of registered listeners
        pub async fn subscriber_count(&self) -> usize {
            self.listeners.read().await.len()
        }

        /// Subscribe to every action processed by this store
        ///
        /// Includes actions sent directly and actions fed back by effects.
        /// A receiver that falls more than `broadcast_capacity` actions behind
        /// gets [`broadcast::error::RecvError::Lagged`].
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Clone the current state
        pub async fn snapshot(&self) -> S
        where
            S: Clone,
        {
            self.state.read().await.clone()
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Rejects new actions, then waits for in-flight effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    ::metrics::counter!(SHUTDOWN, "outcome" => "completed").increment(1);
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    ::metrics::counter!(SHUTDOWN, "outcome" => "timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tracing::debug!(pending_effects = pending, "Waiting for effects to complete");
                tokio::time::sleep(poll_interval).await;
            }
        }

        /// [`Store::shutdown`] with the configured default timeout
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] like [`Store::shutdown`].
        pub async fn shutdown_gracefully(&self) -> Result<(), StoreError> {
            self.shutdown(self.config.default_shutdown_timeout).await
        }

        /// Whether `shutdown` has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        fn track_pending(&self) -> AtomicCounterGuard {
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            AtomicCounterGuard(Arc::clone(&self.pending_effects))
        }

        /// Execute one effect description
        ///
        /// Spawns a task for anything asynchronous; actions produced by
        /// effects go back through [`Store::send`].
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    ::metrics::counter!(EFFECTS_EXECUTED, "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    ::metrics::counter!(EFFECTS_EXECUTED, "type" => "future").increment(1);
                    tracking.increment();
                    let pending_guard = self.track_pending();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking);
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            if let Err(error) = store.send(action).await {
                                tracing::warn!(%error, "Dropped action produced by effect");
                            }
                        }
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    ::metrics::counter!(EFFECTS_EXECUTED, "type" => "parallel").increment(1);

                    for effect in effects {
                        self.execute_effect(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    let effect_count = effects.len();
                    tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);
                    ::metrics::counter!(EFFECTS_EXECUTED, "type" => "sequential").increment(1);
                    tracking.increment();
                    let pending_guard = self.track_pending();
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = DecrementGuard(tracking);
                        let _pending_guard = pending_guard;

                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!(
                                "Executing sequential effect {} of {}",
                                idx + 1,
                                effect_count
                            );

                            let (sub_tx, mut sub_rx) = watch::channel(());
                            let sub_tracking = EffectTracking {
                                counter: Arc::new(AtomicUsize::new(0)),
                                notifier: sub_tx,
                            };

                            store.execute_effect(effect, sub_tracking.clone());

                            while sub_tracking.counter.load(Ordering::SeqCst) > 0 {
                                if sub_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        }
                        tracing::trace!("Effect::Sequential completed");
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                listeners: Arc::clone(&self.listeners),
                next_subscription: Arc::clone(&self.next_subscription),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
                config: self.config.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::{Store, SubscriptionId};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use composable_todo_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
    use composable_todo_testing::RecordingListener;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Inbox {
        unread: u32,
        archived: Vec<u32>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum InboxAction {
        Receive,
        Archive(u32),
        Fetch,
        FetchAll,
        FetchInOrder,
        Explode,
        Ignore,
    }

    #[derive(Debug, Clone)]
    struct InboxEnv;

    #[derive(Debug, Clone)]
    struct InboxReducer;

    impl Reducer for InboxReducer {
        type State = Inbox;
        type Action = InboxAction;
        type Environment = InboxEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                InboxAction::Receive => {
                    state.unread += 1;
                    SmallVec::new()
                },
                InboxAction::Archive(id) => {
                    state.archived.push(id);
                    SmallVec::new()
                },
                InboxAction::Ignore => smallvec![Effect::None],
                InboxAction::Fetch => {
                    smallvec![Effect::Future(Box::pin(async { Some(InboxAction::Receive) }))]
                },
                InboxAction::FetchAll => smallvec![Effect::merge(vec![
                    Effect::Future(Box::pin(async { Some(InboxAction::Receive) })),
                    Effect::Future(Box::pin(async { Some(InboxAction::Receive) })),
                    Effect::Future(Box::pin(async { None })),
                ])],
                InboxAction::FetchInOrder => smallvec![Effect::chain(vec![
                    Effect::Future(Box::pin(async {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        Some(InboxAction::Archive(1))
                    })),
                    Effect::Future(Box::pin(async { Some(InboxAction::Archive(2)) })),
                    Effect::Future(Box::pin(async { Some(InboxAction::Archive(3)) })),
                ])],
                InboxAction::Explode => smallvec![Effect::Future(Box::pin(async {
                    let fail = true;
                    if fail {
                        panic!("effect failure under test");
                    }
                    None
                }))],
            }
        }
    }

    fn store() -> Store<Inbox, InboxAction, InboxEnv, InboxReducer> {
        Store::new(Inbox::default(), InboxReducer, InboxEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        composable_todo_testing::helpers::init_test_tracing();
        let store = store();
        assert_eq!(store.snapshot().await, Inbox::default());
        assert_eq!(store.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_runs_reducer() {
        let store = store();

        store.send(InboxAction::Receive).await.unwrap();
        store.send(InboxAction::Receive).await.unwrap();
        store.send(InboxAction::Archive(7)).await.unwrap();

        let inbox = store.snapshot().await;
        assert_eq!(inbox.unread, 2);
        assert_eq!(inbox.archived, vec![7]);
    }

    #[tokio::test]
    async fn test_subscriber_sees_post_action_state() {
        let store = store();
        let seen = RecordingListener::new();

        store
            .subscribe(seen.listener(|inbox: &Inbox| inbox.unread))
            .await;

        store.send(InboxAction::Receive).await.unwrap();
        store.send(InboxAction::Ignore).await.unwrap();
        store.send(InboxAction::Receive).await.unwrap();

        // Notified once per dispatch, before send returned
        assert_eq!(seen.calls(), vec![1, 1, 2]);
    }

    #[tokio::test]
    async fn test_subscribe_does_not_notify_immediately() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        store
            .subscribe(move |_: &Inbox| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_subscribers_notified_in_subscription_order() {
        let store = store();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            store
                .subscribe(move |_: &Inbox| order.lock().unwrap().push(name))
                .await;
        }

        store.send(InboxAction::Receive).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_notifications() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = store
            .subscribe(move |_: &Inbox| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        store.send(InboxAction::Receive).await.unwrap();
        assert!(store.unsubscribe(id).await);
        assert!(!store.unsubscribe(id).await);
        store.send(InboxAction::Receive).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count().await, 0);
    }

    #[tokio::test]
    async fn test_subscription_ids_are_distinct() {
        let store = store();
        let a = store.subscribe(|_: &Inbox| {}).await;
        let b = store.subscribe(|_: &Inbox| {}).await;
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "sub-0");
    }

    #[tokio::test]
    async fn test_effect_future_feeds_back() {
        let store = store();

        let mut handle = store.send(InboxAction::Fetch).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.unread).await, 1);
    }

    #[tokio::test]
    async fn test_effect_parallel() {
        let store = store();

        let mut handle = store.send(InboxAction::FetchAll).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.unread).await, 2);
    }

    #[tokio::test]
    async fn test_effect_sequential_preserves_order() {
        let store = store();

        let mut handle = store.send(InboxAction::FetchInOrder).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.archived.clone()).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() {
        let store = store();

        let mut handle = store.send(InboxAction::Explode).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        // Store keeps working after a panicking effect
        store.send(InboxAction::Receive).await.unwrap();
        assert_eq!(store.state(|s| s.unread).await, 1);
    }

    #[tokio::test]
    async fn test_action_observers_see_every_action() {
        let store = store();
        let mut rx = store.subscribe_actions();

        let mut handle = store.send(InboxAction::Fetch).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), InboxAction::Fetch);
        assert_eq!(rx.recv().await.unwrap(), InboxAction::Receive);
    }

    #[tokio::test]
    async fn test_concurrent_sends_serialize() {
        let store = store();
        let notified = RecordingListener::new();

        store
            .subscribe(notified.listener(|inbox: &Inbox| inbox.unread))
            .await;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(InboxAction::Receive).await;
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                panic!("concurrent send task panicked: {e}");
            }
        }

        assert_eq!(store.state(|s| s.unread).await, 10);
        // Each notification observed a distinct post-action state
        let mut seen = notified.calls();
        seen.sort_unstable();
        assert_eq!(seen, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_store_clone_shares_state() {
        let store1 = store();
        let store2 = store1.clone();

        store1.send(InboxAction::Receive).await.unwrap();
        assert_eq!(store2.state(|s| s.unread).await, 1);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let store = store();

        store.shutdown(Duration::from_secs(1)).await.unwrap();
        assert!(store.is_shutting_down());

        let result = store.send(InboxAction::Receive).await;
        assert_eq!(result.unwrap_err(), StoreError::ShutdownInProgress);
        assert_eq!(store.state(|s| s.unread).await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_times_out_on_stuck_effect() {
        #[derive(Clone)]
        struct SlowReducer;

        impl Reducer for SlowReducer {
            type State = ();
            type Action = ();
            type Environment = ();

            fn reduce(&self, _: &mut (), _: (), _: &()) -> SmallVec<[Effect<()>; 4]> {
                smallvec![Effect::Future(Box::pin(async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    None
                }))]
            }
        }

        let store = Store::new((), SlowReducer, ());
        store.send(()).await.unwrap();

        let result = store.shutdown(Duration::from_millis(30)).await;
        assert_eq!(result, Err(StoreError::ShutdownTimeout(1)));
    }

    #[tokio::test]
    async fn test_completed_handle_does_not_wait() {
        let mut handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        handle.wait_with_timeout(Duration::from_millis(10)).await.unwrap();
    }

    #[test]
    fn test_store_config_builder() {
        let config = StoreConfig::default()
            .with_broadcast_capacity(0)
            .with_shutdown_timeout(Duration::from_secs(2));

        assert_eq!(config.broadcast_capacity, 1);
        assert_eq!(config.default_shutdown_timeout, Duration::from_secs(2));
        assert_eq!(StoreConfig::new(0, Duration::ZERO).broadcast_capacity, 1);
    }
}

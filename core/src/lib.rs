//! # Composable Todo Core
//!
//! Core traits and types for a unidirectional state container.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: Tagged description of an intended state change
//! - **Reducer**: Function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//! - No process-wide mutable state
//!
//! ## Example
//!
//! ```
//! use composable_todo_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct FilterState {
//!     show_done: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum FilterAction {
//!     ShowDone(bool),
//! }
//!
//! struct FilterReducer;
//!
//! impl Reducer for FilterReducer {
//!     type State = FilterState;
//!     type Action = FilterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut FilterState,
//!         action: FilterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<FilterAction>; 4]> {
//!         match action {
//!             FilterAction::ShowDone(show) => state.show_done = show,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = FilterState::default();
//! let effects = FilterReducer.reduce(&mut state, FilterAction::ShowDone(true), &());
//! assert!(state.show_done);
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities
pub mod composition;

/// Reducer module - The core trait for state transitions
///
/// Reducers are functions: `(State, Action, Environment) → (State, Effects)`.
/// They hold all state-transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// Actions a reducer does not care about must leave state untouched and
    /// return no effects.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// External dependencies are abstracted behind traits and injected
/// via the Environment parameter, or held by the shell that builds actions.
pub mod environment {
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Source of unique identifiers
    ///
    /// Implementations must never hand out the same id twice for the
    /// lifetime of the generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use composable_todo_core::environment::{IdGenerator, MonotonicIdGenerator};
    ///
    /// let ids = MonotonicIdGenerator::new();
    /// assert_eq!(ids.next_id(), 0);
    /// assert_eq!(ids.next_id(), 1);
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce the next id
        fn next_id(&self) -> u64;

        /// Mark `id` as taken by someone else, so `next_id` never returns it
        fn reserve(&self, id: u64);
    }

    /// Production id generator backed by an atomic counter
    #[derive(Debug, Default)]
    pub struct MonotonicIdGenerator {
        next: AtomicU64,
    }

    impl MonotonicIdGenerator {
        /// Create a generator starting at 0
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(0)
        }

        /// Create a generator whose first id is `start`
        #[must_use]
        pub const fn starting_at(start: u64) -> Self {
            Self {
                next: AtomicU64::new(start),
            }
        }

        /// The id the next call to [`IdGenerator::next_id`] will return
        #[must_use]
        pub fn peek(&self) -> u64 {
            self.next.load(Ordering::Acquire)
        }
    }

    impl IdGenerator for MonotonicIdGenerator {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::AcqRel)
        }

        fn reserve(&self, id: u64) {
            self.next.fetch_max(id.saturating_add(1), Ordering::AcqRel);
        }
    }
}

// Re-export the core vocabulary at the crate root
pub use effect::Effect;
pub use reducer::Reducer;

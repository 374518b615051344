//! Reducer composition utilities
//!
//! - **`combine_reducers`**: Run several reducers on the same state and action
//! - **`scope_reducer`**: Focus a reducer on one field of a larger state
//!
//! Together they build a root reducer out of small ones, each owning one key
//! of the root state:
//!
//! ```
//! use composable_todo_core::composition::{combine_reducers, scope_reducer};
//! use composable_todo_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug)]
//! enum Action {
//!     Type(char),
//!     Rename(String),
//! }
//!
//! #[derive(Clone, Debug, Default)]
//! struct Editor {
//!     buffer: String,
//!     title: String,
//! }
//!
//! struct BufferReducer;
//! struct TitleReducer;
//!
//! impl Reducer for BufferReducer {
//!     type State = String;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, buffer: &mut String, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         if let Action::Type(c) = action {
//!             buffer.push(c);
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! impl Reducer for TitleReducer {
//!     type State = String;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, title: &mut String, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         if let Action::Rename(name) = action {
//!             *title = name;
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let root = combine_reducers(vec![
//!     Box::new(scope_reducer(BufferReducer, |e: &Editor| &e.buffer, |e: &mut Editor, b: String| e.buffer = b)),
//!     Box::new(scope_reducer(TitleReducer, |e: &Editor| &e.title, |e: &mut Editor, t: String| e.title = t)),
//! ]);
//!
//! let mut editor = Editor::default();
//! let _ = root.reduce(&mut editor, Action::Type('x'), &());
//! let _ = root.reduce(&mut editor, Action::Rename("notes".to_string()), &());
//! assert_eq!(editor.buffer, "x");
//! assert_eq!(editor.title, "notes");
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// A boxed reducer that can be shared with the runtime
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in order with its own clone of the action, and all
/// effects are concatenated in the same order.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of reducers combined
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// `get_state` borrows the child state out of the parent, `set_state` writes
/// the reduced child back. The child is cloned for the duration of one
/// `reduce` call.
pub fn scope_reducer<S, SubS, A, E, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
    _phantom: std::marker::PhantomData<fn(A, &E)>,
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut sub_state = (self.get_state)(state).clone();

        let effects = self.reducer.reduce(&mut sub_state, action, env);

        (self.set_state)(state, sub_state);

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Playlist {
        tracks: Vec<String>,
        shuffle: bool,
    }

    #[derive(Clone, Debug)]
    enum PlaylistAction {
        Enqueue(String),
        SetShuffle(bool),
        Ping,
    }

    struct TracksReducer;

    impl Reducer for TracksReducer {
        type State = Vec<String>;
        type Action = PlaylistAction;
        type Environment = ();

        fn reduce(
            &self,
            tracks: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                PlaylistAction::Enqueue(track) => {
                    tracks.push(track);
                    SmallVec::new()
                },
                PlaylistAction::Ping => smallvec![Effect::None],
                PlaylistAction::SetShuffle(_) => SmallVec::new(),
            }
        }
    }

    struct ShuffleReducer;

    impl Reducer for ShuffleReducer {
        type State = bool;
        type Action = PlaylistAction;
        type Environment = ();

        fn reduce(
            &self,
            shuffle: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                PlaylistAction::SetShuffle(on) => {
                    *shuffle = on;
                    SmallVec::new()
                },
                PlaylistAction::Ping => smallvec![Effect::None],
                PlaylistAction::Enqueue(_) => SmallVec::new(),
            }
        }
    }

    fn playlist_reducer() -> CombinedReducer<Playlist, PlaylistAction, ()> {
        combine_reducers(vec![
            Box::new(scope_reducer(
                TracksReducer,
                |p: &Playlist| &p.tracks,
                |p: &mut Playlist, tracks: Vec<String>| p.tracks = tracks,
            )),
            Box::new(scope_reducer(
                ShuffleReducer,
                |p: &Playlist| &p.shuffle,
                |p: &mut Playlist, shuffle: bool| p.shuffle = shuffle,
            )),
        ])
    }

    #[test]
    fn test_scoped_reducer_touches_only_its_key() {
        let scoped = scope_reducer(
            TracksReducer,
            |p: &Playlist| &p.tracks,
            |p: &mut Playlist, tracks: Vec<String>| p.tracks = tracks,
        );

        let mut state = Playlist {
            tracks: vec![],
            shuffle: true,
        };

        let _ = scoped.reduce(&mut state, PlaylistAction::Enqueue("intro".to_string()), &());
        assert_eq!(state.tracks, vec!["intro".to_string()]);
        assert!(state.shuffle);
    }

    #[test]
    fn test_combined_reducer_routes_every_action_to_every_key() {
        let root = playlist_reducer();
        assert_eq!(root.len(), 2);

        let mut state = Playlist::default();
        let _ = root.reduce(&mut state, PlaylistAction::Enqueue("a".to_string()), &());
        let _ = root.reduce(&mut state, PlaylistAction::SetShuffle(true), &());
        let _ = root.reduce(&mut state, PlaylistAction::Enqueue("b".to_string()), &());

        assert_eq!(
            state,
            Playlist {
                tracks: vec!["a".to_string(), "b".to_string()],
                shuffle: true,
            }
        );
    }

    #[test]
    fn test_combined_reducer_concatenates_effects() {
        let root = playlist_reducer();
        let mut state = Playlist::default();

        let effects = root.reduce(&mut state, PlaylistAction::Ping, &());
        assert_eq!(effects.len(), 2);
        assert_eq!(state, Playlist::default());
    }

    #[test]
    fn test_empty_combination_is_identity() {
        let root: CombinedReducer<Playlist, PlaylistAction, ()> = combine_reducers(vec![]);
        assert!(root.is_empty());

        let mut state = Playlist::default();
        let effects = root.reduce(&mut state, PlaylistAction::SetShuffle(true), &());
        assert!(effects.is_empty());
        assert_eq!(state, Playlist::default());
    }
}

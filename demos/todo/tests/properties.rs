//! Property tests for the reducers and the visible-todos selector

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use composable_todo_core::reducer::Reducer;
use proptest::prelude::*;
use todo::{
    AppState, Todo, TodoAction, TodoEnvironment, TodoId, TodosReducer, VisibilityFilter,
    app_reducer, visible_todos,
};

fn arb_filter() -> impl Strategy<Value = VisibilityFilter> {
    prop_oneof![
        Just(VisibilityFilter::ShowAll),
        Just(VisibilityFilter::ShowActive),
        Just(VisibilityFilter::ShowCompleted),
    ]
}

/// Lists with unique, increasing ids
fn arb_todos() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::vec(("[a-z]{1,8}", any::<bool>()), 0..16).prop_map(|items| {
        items
            .into_iter()
            .zip(0u64..)
            .map(|((text, completed), id)| Todo {
                id: TodoId::new(id),
                text,
                completed,
            })
            .collect()
    })
}

fn arb_action() -> impl Strategy<Value = TodoAction> {
    prop_oneof![
        (0u64..32, "[a-z]{1,8}").prop_map(|(id, text)| TodoAction::add(id, text)),
        (0u64..32).prop_map(TodoAction::toggle),
        arb_filter().prop_map(TodoAction::filter),
        Just(TodoAction::Unknown),
    ]
}

proptest! {
    #[test]
    fn selector_partitions_list(todos in arb_todos()) {
        let all = visible_todos(&todos, VisibilityFilter::ShowAll);
        let active = visible_todos(&todos, VisibilityFilter::ShowActive);
        let completed = visible_todos(&todos, VisibilityFilter::ShowCompleted);

        prop_assert_eq!(all.len(), todos.len());
        prop_assert!(active.iter().all(|t| !t.completed));
        prop_assert!(completed.iter().all(|t| t.completed));
        prop_assert_eq!(active.len() + completed.len(), todos.len());
    }

    #[test]
    fn selector_preserves_order(todos in arb_todos(), filter in arb_filter()) {
        let ids: Vec<TodoId> = visible_todos(&todos, filter).iter().map(|t| t.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(ids, sorted);
    }

    #[test]
    fn add_appends_exactly_one_uncompleted(todos in arb_todos(), text in "[a-z]{1,8}") {
        let fresh = todos.len() as u64;
        let mut state = todos.clone();
        let effects = TodosReducer.reduce(
            &mut state,
            TodoAction::add(fresh, text.clone()),
            &TodoEnvironment::default(),
        );

        prop_assert!(effects.is_empty());
        prop_assert_eq!(&state[..todos.len()], &todos[..]);
        prop_assert_eq!(state.len(), todos.len() + 1);
        prop_assert_eq!(state.last().unwrap(), &Todo::new(TodoId::new(fresh), text));
    }

    #[test]
    fn toggle_flips_only_its_todo(todos in arb_todos(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!todos.is_empty());
        let target = todos[pick.index(todos.len())].id;

        let mut state = todos.clone();
        let _ = TodosReducer.reduce(
            &mut state,
            TodoAction::ToggleTodo { id: target },
            &TodoEnvironment::default(),
        );

        for (before, after) in todos.iter().zip(&state) {
            prop_assert_eq!(before.id, after.id);
            prop_assert_eq!(&before.text, &after.text);
            if before.id == target {
                prop_assert_eq!(after.completed, !before.completed);
            } else {
                prop_assert_eq!(after.completed, before.completed);
            }
        }
    }

    #[test]
    fn unknown_action_is_identity(
        todos in arb_todos(),
        filter in arb_filter(),
        actions in prop::collection::vec(arb_action(), 0..8),
    ) {
        let reducer = app_reducer();
        let env = TodoEnvironment::default();
        let mut state = AppState { todos, visibility_filter: filter };
        for action in actions {
            let _ = reducer.reduce(&mut state, action, &env);
        }

        let before = state.clone();
        let effects = reducer.reduce(&mut state, TodoAction::Unknown, &env);

        prop_assert!(effects.is_empty());
        prop_assert_eq!(state, before);
    }
}

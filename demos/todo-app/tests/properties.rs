//! Property tests for both reducers and settings persistence

use proptest::prelude::*;
use statekit_core::reducer::Reducer;
use statekit_persist::{MemoryStorage, Persist, PersistOptions, Storage};
use statekit_testing::test_clock;
use std::sync::Arc;
use todo_app::settings::{
    PreferencesPatch, SettingsAction, SettingsReducer, SettingsState, SortBy,
};
use todo_app::todos::{TodoAction, TodoEnvironment, TodoReducer, TodoState};

fn env() -> TodoEnvironment {
    TodoEnvironment::new(Arc::new(test_clock()))
}

/// Builds a list from `(text, completed)` pairs, skipping blank texts
fn build(items: &[(String, bool)]) -> TodoState {
    let env = env();
    let mut state = TodoState::new();
    for (text, completed) in items {
        TodoReducer.reduce(&mut state, TodoAction::AddTodo { text: text.clone() }, &env);
        if *completed && !text.trim().is_empty() {
            let id = state.todos[state.todos.len() - 1].id;
            TodoReducer.reduce(&mut state, TodoAction::ToggleTodo { id }, &env);
        }
    }
    state
}

fn items() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec(("[a-z]{1,8}", any::<bool>()), 0..12)
}

fn settings_action() -> impl Strategy<Value = SettingsAction> {
    prop_oneof![
        "[A-Za-z ]{0,10}".prop_map(|username| SettingsAction::SetUsername { username }),
        Just(SettingsAction::ToggleTheme),
        (
            prop::option::of(any::<bool>()),
            prop::option::of(prop_oneof![Just(SortBy::Date), Just(SortBy::Name)])
        )
            .prop_map(|(show_completed, sort_by)| SettingsAction::UpdatePreferences {
                patch: PreferencesPatch {
                    show_completed,
                    sort_by
                }
            }),
        Just(SettingsAction::Reset),
    ]
}

proptest! {
    #[test]
    fn prop_add_non_blank_appends_one_active_item(
        existing in items(),
        text in "[ ]{0,3}[a-zA-Z0-9][a-zA-Z0-9 ]{0,20}",
    ) {
        let mut state = build(&existing);
        let before = state.count();

        TodoReducer.reduce(&mut state, TodoAction::AddTodo { text: text.clone() }, &env());

        prop_assert_eq!(state.count(), before + 1);
        let last = &state.todos[state.count() - 1];
        prop_assert!(!last.completed);
        prop_assert_eq!(last.text.as_str(), text.trim());
    }

    #[test]
    fn prop_add_blank_is_noop(existing in items(), blank in "[ \t\n]{0,6}") {
        let mut state = build(&existing);
        let before = state.clone();

        TodoReducer.reduce(&mut state, TodoAction::AddTodo { text: blank }, &env());

        prop_assert_eq!(state, before);
    }

    #[test]
    fn prop_ids_stay_unique(existing in items()) {
        let state = build(&existing);
        let mut ids: Vec<_> = state.todos.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), state.count());
    }

    #[test]
    fn prop_toggle_twice_restores(existing in items(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!existing.is_empty());
        let mut state = build(&existing);
        let before = state.clone();
        let id = state.todos[pick.index(state.count())].id;

        TodoReducer.reduce(&mut state, TodoAction::ToggleTodo { id }, &env());
        TodoReducer.reduce(&mut state, TodoAction::ToggleTodo { id }, &env());

        prop_assert_eq!(state, before);
    }

    #[test]
    fn prop_delete_then_toggle_is_noop(existing in items(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!existing.is_empty());
        let mut state = build(&existing);
        let id = state.todos[pick.index(state.count())].id;

        TodoReducer.reduce(&mut state, TodoAction::DeleteTodo { id }, &env());
        let after_delete = state.clone();
        TodoReducer.reduce(&mut state, TodoAction::ToggleTodo { id }, &env());

        prop_assert!(!state.exists(id));
        prop_assert_eq!(state, after_delete);
    }

    #[test]
    fn prop_clear_completed_keeps_active_in_order(existing in items()) {
        let mut state = build(&existing);
        let active: Vec<_> = state
            .todos
            .iter()
            .filter(|t| !t.completed)
            .cloned()
            .collect();

        TodoReducer.reduce(&mut state, TodoAction::ClearCompleted, &env());

        prop_assert_eq!(state.completed_count(), 0);
        prop_assert_eq!(state.todos, active);
    }

    #[test]
    fn prop_reset_yields_defaults(actions in prop::collection::vec(settings_action(), 0..10)) {
        let mut state = SettingsState::default();
        for action in actions {
            SettingsReducer.reduce(&mut state, action, &());
        }

        SettingsReducer.reduce(&mut state, SettingsAction::Reset, &());

        prop_assert_eq!(state, SettingsState::default());
    }

    #[test]
    fn prop_settings_survive_reinitialization(
        actions in prop::collection::vec(settings_action(), 1..10),
    ) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let options = PersistOptions::new("user-storage");

        let persist = Persist::new(SettingsReducer, storage.clone(), options.clone());
        let mut state = persist.hydrate(SettingsState::default());
        for action in actions {
            persist.reduce(&mut state, action, &());
        }
        drop(persist);

        let reopened = Persist::new(SettingsReducer, storage, options);
        let restored = reopened.hydrate(SettingsState::default());

        prop_assert_eq!(restored, state);
    }
}

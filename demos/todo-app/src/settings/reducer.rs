//! Reducer logic for the settings store.

use super::types::{PreferencesPatch, SettingsState};
use statekit_core::reducer::Reducer;

/// Operations on the settings store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsAction {
    /// Replace the username (empty is allowed)
    SetUsername {
        /// New name
        username: String,
    },
    /// Flip between light and dark
    ToggleTheme,
    /// Shallow-merge the given preference fields
    UpdatePreferences {
        /// Fields to change
        patch: PreferencesPatch,
    },
    /// Restore the default settings
    Reset,
}

/// Reducer for the settings store
#[derive(Clone, Debug, Default)]
pub struct SettingsReducer;

impl SettingsReducer {
    /// Creates a new `SettingsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for SettingsReducer {
    type State = SettingsState;
    type Action = SettingsAction;
    type Environment = ();

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &()) {
        match action {
            SettingsAction::SetUsername { username } => state.username = username,
            SettingsAction::ToggleTheme => state.theme = state.theme.toggled(),
            SettingsAction::UpdatePreferences { patch } => patch.apply_to(&mut state.preferences),
            SettingsAction::Reset => *state = SettingsState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::types::{Preferences, SortBy, Theme};
    use statekit_testing::ReducerTest;

    fn customized() -> SettingsState {
        SettingsState {
            username: "Ada".to_string(),
            theme: Theme::Dark,
            preferences: Preferences {
                show_completed: false,
                sort_by: SortBy::Name,
            },
        }
    }

    #[test]
    fn test_set_username() {
        ReducerTest::new(SettingsReducer::new())
            .with_env(())
            .given_state(SettingsState::default())
            .when_action(SettingsAction::SetUsername {
                username: "Ada".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.username, "Ada");
            })
            .run();
    }

    #[test]
    fn test_set_username_allows_empty() {
        ReducerTest::new(SettingsReducer::new())
            .with_env(())
            .given_state(SettingsState::default())
            .when_action(SettingsAction::SetUsername {
                username: String::new(),
            })
            .then_state(|state| {
                assert_eq!(state.username, "");
            })
            .run();
    }

    #[test]
    fn test_toggle_theme_twice() {
        ReducerTest::new(SettingsReducer::new())
            .with_env(())
            .given_state(SettingsState::default())
            .when_action(SettingsAction::ToggleTheme)
            .then_state(|state| {
                assert_eq!(state.theme, Theme::Dark);
            })
            .run();

        ReducerTest::new(SettingsReducer::new())
            .with_env(())
            .given_state(SettingsState::default())
            .when_action(SettingsAction::ToggleTheme)
            .when_action(SettingsAction::ToggleTheme)
            .then_state(|state| {
                assert_eq!(state.theme, Theme::Light);
            })
            .run();
    }

    #[test]
    fn test_update_preferences_is_shallow_merge() {
        ReducerTest::new(SettingsReducer::new())
            .with_env(())
            .given_state(customized())
            .when_action(SettingsAction::UpdatePreferences {
                patch: PreferencesPatch::show_completed(true),
            })
            .then_state(|state| {
                assert!(state.preferences.show_completed);
                assert_eq!(state.preferences.sort_by, SortBy::Name);
                assert_eq!(state.username, "Ada");
            })
            .run();
    }

    #[test]
    fn test_reset_restores_defaults() {
        ReducerTest::new(SettingsReducer::new())
            .with_env(())
            .given_state(customized())
            .when_action(SettingsAction::Reset)
            .then_state(|state| {
                assert_eq!(*state, SettingsState::default());
            })
            .run();
    }
}

//! Settings store: user identity and display preferences, persisted.

pub mod reducer;
pub mod types;

pub use reducer::{SettingsAction, SettingsReducer};
pub use types::{
    DEFAULT_USERNAME, ParseSortByError, Preferences, PreferencesPatch, SettingsState, SortBy, Theme,
};

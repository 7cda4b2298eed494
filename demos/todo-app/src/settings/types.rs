//! Domain types for the settings store.
//!
//! These are persisted, so field names on the wire are fixed:
//! `username`, `theme`, `preferences.showCompleted`, `preferences.sortBy`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name used until the user picks one
pub const DEFAULT_USERNAME: &str = "Guest";

/// Color theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

/// Requested list ordering
///
/// Stored and editable, but the list is always shown in insertion order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Creation date
    #[default]
    Date,
    /// Item text
    Name,
}

/// Error returned when a sort name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order '{0}' (expected date or name)")]
pub struct ParseSortByError(String);

impl FromStr for SortBy {
    type Err = ParseSortByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            _ => Err(ParseSortByError(s.to_string())),
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date => f.write_str("date"),
            Self::Name => f.write_str("name"),
        }
    }
}

/// Display preferences
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Whether completed items appear in the list at all
    pub show_completed: bool,
    /// Requested ordering (not applied)
    pub sort_by: SortBy,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_completed: true,
            sort_by: SortBy::Date,
        }
    }
}

/// Partial update of [`Preferences`]; `None` fields are left alone
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    /// New `show_completed`, if any
    pub show_completed: Option<bool>,
    /// New `sort_by`, if any
    pub sort_by: Option<SortBy>,
}

impl PreferencesPatch {
    /// Patch that only sets `show_completed`
    #[must_use]
    pub const fn show_completed(show: bool) -> Self {
        Self {
            show_completed: Some(show),
            sort_by: None,
        }
    }

    /// Patch that only sets `sort_by`
    #[must_use]
    pub const fn sort_by(sort_by: SortBy) -> Self {
        Self {
            show_completed: None,
            sort_by: Some(sort_by),
        }
    }

    /// Shallow-merge into `preferences`
    pub fn apply_to(self, preferences: &mut Preferences) {
        if let Some(show) = self.show_completed {
            preferences.show_completed = show;
        }
        if let Some(sort_by) = self.sort_by {
            preferences.sort_by = sort_by;
        }
    }
}

/// State of the settings store
///
/// Always fully defined: any field missing from a persisted record takes its
/// default value on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsState {
    /// Display name
    pub username: String,
    /// Color theme
    pub theme: Theme,
    /// Display preferences
    pub preferences: Preferences,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            theme: Theme::Light,
            preferences: Preferences::default(),
        }
    }
}

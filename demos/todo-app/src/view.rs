//! Derived view of the task list.
//!
//! Nothing here is stored: the visible list is recomputed from the task store
//! and the settings store's preferences whenever either changes.

use crate::settings::Preferences;
use crate::todos::{TodoItem, TodoState};

/// Items to display, in insertion order
///
/// Completed items are dropped first when `show_completed` is off; the
/// active filter is applied to what remains. `sort_by` is ignored.
#[must_use]
pub fn visible_todos(state: &TodoState, preferences: &Preferences) -> Vec<TodoItem> {
    state
        .todos
        .iter()
        .filter(|todo| preferences.show_completed || !todo.completed)
        .filter(|todo| state.filter.matches(todo))
        .cloned()
        .collect()
}

/// One-line summary shown above the list
///
/// The completed count only appears when there is something to clear.
#[must_use]
pub fn status_line(state: &TodoState, shown: usize) -> String {
    let mut line = format!(
        "[{}] {shown} shown, {} active",
        state.filter,
        state.active_count()
    );
    let completed = state.completed_count();
    if completed > 0 {
        line.push_str(&format!(", {completed} completed ('clear' removes them)"));
    }
    line
}

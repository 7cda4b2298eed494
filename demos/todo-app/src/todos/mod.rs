//! Task store: the todo list and its display filter.

pub mod reducer;
pub mod types;

pub use reducer::{TodoAction, TodoEnvironment, TodoReducer};
pub use types::{ParseFilterError, TodoFilter, TodoId, TodoItem, TodoState};

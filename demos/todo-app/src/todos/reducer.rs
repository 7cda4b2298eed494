//! Reducer logic for the task store.
//!
//! Every operation is total: bad input (blank text, unknown ids) is a no-op.

use super::types::{TodoFilter, TodoId, TodoItem, TodoState};
use statekit_core::{environment::Clock, reducer::Reducer};
use std::sync::Arc;

/// Operations on the task store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    /// Append a new item; blank text is ignored
    AddTodo {
        /// Raw text as typed; stored trimmed
        text: String,
    },
    /// Flip `completed` on the matching item
    ToggleTodo {
        /// Item to toggle
        id: TodoId,
    },
    /// Remove the matching item
    DeleteTodo {
        /// Item to delete
        id: TodoId,
    },
    /// Replace the active filter
    SetFilter {
        /// New filter
        filter: TodoFilter,
    },
    /// Remove every completed item
    ClearCompleted,
}

/// Environment dependencies for the task reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for generating ids and timestamps
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// Reducer for the task store
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        match action {
            TodoAction::AddTodo { text } => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!("Ignoring blank todo");
                    return;
                }

                let created_at = env.clock.now();
                let id = state.next_id(created_at);
                state.push(TodoItem::new(id, text.to_string(), created_at));
                tracing::debug!(%id, "Added todo");
            }

            TodoAction::ToggleTodo { id } => {
                if let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) {
                    todo.completed = !todo.completed;
                }
            }

            TodoAction::DeleteTodo { id } => {
                state.todos.retain(|t| t.id != id);
            }

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
            }

            TodoAction::ClearCompleted => {
                state.todos.retain(|t| !t.completed);
            }
        }
    }
}

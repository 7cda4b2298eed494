//! The two application stores wired together.

use crate::config::AppConfig;
use crate::settings::{SettingsAction, SettingsReducer, SettingsState};
use crate::todos::{TodoAction, TodoEnvironment, TodoItem, TodoReducer, TodoState};
use crate::view;
use statekit_core::environment::{Clock, SystemClock};
use statekit_persist::{Persist, PersistOptions, Storage};
use statekit_runtime::Store;
use std::sync::Arc;

/// In-memory task store; starts empty on every launch
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Settings store with write-through persistence
pub type SettingsStore = Store<SettingsState, SettingsAction, (), Persist<SettingsReducer>>;

/// Both stores of the application
///
/// The stores are independent: no action on one touches the other. The only
/// place they meet is [`TodoApp::visible_todos`].
#[derive(Clone)]
pub struct TodoApp {
    todos: TodoStore,
    settings: SettingsStore,
}

impl TodoApp {
    /// Build the stores, hydrating settings from `storage`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, storage: Arc<dyn Storage>, options: PersistOptions) -> Self {
        let todos = Store::new(
            TodoState::new(),
            TodoReducer::new(),
            TodoEnvironment::new(clock),
        );
        let settings = Persist::new(SettingsReducer::new(), storage, options)
            .into_store(SettingsState::default(), ());

        Self { todos, settings }
    }

    /// Build the stores from loaded configuration with the system clock
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        tracing::info!(
            storage = ?config.storage,
            key = %config.settings_key,
            version = config.settings_version,
            "Opening stores"
        );
        Self::new(
            Arc::new(SystemClock),
            config.build_storage(),
            config.settings_persist_options(),
        )
    }

    /// The task store
    #[must_use]
    pub const fn todos(&self) -> &TodoStore {
        &self.todos
    }

    /// The settings store
    #[must_use]
    pub const fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Items to display given both stores' current snapshots
    pub async fn visible_todos(&self) -> Vec<TodoItem> {
        let todos = self.todos.snapshot().await;
        let settings = self.settings.snapshot().await;
        view::visible_todos(&todos, &settings.preferences)
    }
}

impl std::fmt::Debug for TodoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoApp")
            .field("subscribers", &(self.todos.subscriber_count() + self.settings.subscriber_count()))
            .finish_non_exhaustive()
    }
}

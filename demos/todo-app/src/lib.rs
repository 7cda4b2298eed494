//! Todo list with filtering and persisted user settings.
//!
//! Two independent stores back the application:
//!
//! - the **task store** ([`todos`]) holds the items and the active filter in
//!   memory only;
//! - the **settings store** ([`settings`]) holds username, theme and display
//!   preferences, and is wrapped in [`statekit_persist::Persist`] so every
//!   change is written to storage and restored on the next launch.
//!
//! The list the user sees is derived from both in [`view::visible_todos`].
//!
//! # Quick Start
//!
//! ```no_run
//! use statekit_core::environment::SystemClock;
//! use statekit_persist::{MemoryStorage, PersistOptions};
//! use std::sync::Arc;
//! use todo_app::app::TodoApp;
//! use todo_app::todos::TodoAction;
//!
//! # async fn example() {
//! let app = TodoApp::new(
//!     Arc::new(SystemClock),
//!     Arc::new(MemoryStorage::new()),
//!     PersistOptions::new("user-storage"),
//! );
//!
//! app.todos()
//!     .send(TodoAction::AddTodo { text: "Buy milk".to_string() })
//!     .await;
//!
//! for todo in app.visible_todos().await {
//!     println!("{}", todo.text);
//! }
//! # }
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod settings;
pub mod todos;
pub mod view;

pub use app::{SettingsStore, TodoApp, TodoStore};
pub use config::{AppConfig, ConfigError, ParseStorageKindError, StorageKind};

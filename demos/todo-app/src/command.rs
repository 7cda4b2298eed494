//! Line commands for the interactive shell.
//!
//! Positions typed by the user are 1-based indexes into the list as it is
//! currently displayed; they are resolved to ids before an action is sent.

use crate::app::TodoApp;
use crate::settings::{ParseSortByError, PreferencesPatch, SettingsAction, SortBy};
use crate::todos::{ParseFilterError, TodoAction, TodoFilter, TodoId};
use thiserror::Error;

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  add <text>               add a todo
  toggle <n>               toggle the n-th visible todo
  delete <n>               delete the n-th visible todo
  filter all|active|completed
  clear                    remove completed todos
  user <name>              set the username
  theme                    toggle light/dark
  show-completed on|off    show or hide completed todos
  sort date|name           set the sort preference
  reset                    restore default settings
  list                     show the visible todos
  help                     show this text
  quit                     exit";

/// Errors from parsing or running a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Input was blank
    #[error("Empty command")]
    Empty,

    /// First word is not a known command
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    /// Required argument absent
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Description of the argument
        expected: &'static str,
    },

    /// Position is not a positive integer
    #[error("'{0}' is not a list position")]
    InvalidPosition(String),

    /// Position is past the end of the visible list
    #[error("No todo at position {0}")]
    NoSuchItem(usize),

    /// Not `on` or `off`
    #[error("Expected on or off, got '{0}'")]
    InvalidSwitch(String),

    /// Unknown filter name
    #[error(transparent)]
    Filter(#[from] ParseFilterError),

    /// Unknown sort name
    #[error(transparent)]
    SortBy(#[from] ParseSortByError),
}

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <text>`
    Add(String),
    /// `toggle <n>`
    Toggle(usize),
    /// `delete <n>`
    Delete(usize),
    /// `filter <name>`
    Filter(TodoFilter),
    /// `clear`
    Clear,
    /// `user <name>`
    User(String),
    /// `theme`
    Theme,
    /// `show-completed on|off`
    ShowCompleted(bool),
    /// `sort date|name`
    Sort(SortBy),
    /// `reset`
    Reset,
    /// `list`
    List,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// What the shell should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Print the visible list, then read the next line
    ShowList,
    /// Print help, then read the next line
    ShowHelp,
    /// Exit the shell
    Quit,
}

impl Command {
    /// Parse one input line
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the line is blank, names an unknown
    /// command, or has a missing or malformed argument.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        match name.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "add" => required(rest, "add", "some text").map(|text| Self::Add(text.to_string())),
            "toggle" => position(rest, "toggle").map(Self::Toggle),
            "delete" | "rm" => position(rest, "delete").map(Self::Delete),
            "filter" => Ok(Self::Filter(required(rest, "filter", "all, active or completed")?.parse()?)),
            "clear" => Ok(Self::Clear),
            // Empty usernames are allowed.
            "user" => Ok(Self::User(rest.to_string())),
            "theme" => Ok(Self::Theme),
            "show-completed" => {
                match required(rest, "show-completed", "on or off")?.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => Ok(Self::ShowCompleted(true)),
                    "off" | "false" | "no" => Ok(Self::ShowCompleted(false)),
                    _ => Err(CommandError::InvalidSwitch(rest.to_string())),
                }
            }
            "sort" => Ok(Self::Sort(required(rest, "sort", "date or name")?.parse()?)),
            "reset" => Ok(Self::Reset),
            "list" | "ls" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Run the command against `app`
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NoSuchItem`] if a position is past the end of
    /// the visible list.
    pub async fn run(self, app: &TodoApp) -> Result<Flow, CommandError> {
        match self {
            Self::Add(text) => {
                app.todos().send(TodoAction::AddTodo { text }).await;
                Ok(Flow::ShowList)
            }
            Self::Toggle(n) => {
                let id = resolve(app, n).await?;
                app.todos().send(TodoAction::ToggleTodo { id }).await;
                Ok(Flow::ShowList)
            }
            Self::Delete(n) => {
                let id = resolve(app, n).await?;
                app.todos().send(TodoAction::DeleteTodo { id }).await;
                Ok(Flow::ShowList)
            }
            Self::Filter(filter) => {
                app.todos().send(TodoAction::SetFilter { filter }).await;
                Ok(Flow::ShowList)
            }
            Self::Clear => {
                app.todos().send(TodoAction::ClearCompleted).await;
                Ok(Flow::ShowList)
            }
            Self::User(username) => {
                app.settings().send(SettingsAction::SetUsername { username }).await;
                Ok(Flow::Continue)
            }
            Self::Theme => {
                app.settings().send(SettingsAction::ToggleTheme).await;
                Ok(Flow::Continue)
            }
            Self::ShowCompleted(show) => {
                app.settings()
                    .send(SettingsAction::UpdatePreferences {
                        patch: PreferencesPatch::show_completed(show),
                    })
                    .await;
                Ok(Flow::ShowList)
            }
            Self::Sort(sort_by) => {
                app.settings()
                    .send(SettingsAction::UpdatePreferences {
                        patch: PreferencesPatch::sort_by(sort_by),
                    })
                    .await;
                Ok(Flow::Continue)
            }
            Self::Reset => {
                app.settings().send(SettingsAction::Reset).await;
                Ok(Flow::ShowList)
            }
            Self::List => Ok(Flow::ShowList),
            Self::Help => Ok(Flow::ShowHelp),
            Self::Quit => Ok(Flow::Quit),
        }
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn position(rest: &str, command: &'static str) -> Result<usize, CommandError> {
    let raw = required(rest, command, "a list position")?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidPosition(raw.to_string())),
    }
}

async fn resolve(app: &TodoApp, position: usize) -> Result<TodoId, CommandError> {
    let visible = app.visible_todos().await;
    position
        .checked_sub(1)
        .and_then(|index| visible.get(index))
        .map(|todo| todo.id)
        .ok_or(CommandError::NoSuchItem(position))
}

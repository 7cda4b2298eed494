//! Interactive shell for the todo application.
//!
//! Reads one command per line from stdin. Settings changes are persisted as
//! they happen, so `user`, `theme`, `show-completed` and `sort` survive a
//! restart; todos do not.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use todo_app::command::{Command, Flow, HELP};
use todo_app::settings::SettingsState;
use todo_app::todos::TodoItem;
use todo_app::view;
use todo_app::{AppConfig, TodoApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    statekit_runtime::metrics::describe_metrics();
    statekit_persist::describe_metrics();

    let app = TodoApp::from_config(&config);

    // Held for the lifetime of the shell; dropping them unsubscribes.
    let (username, _username_sub) = app
        .settings()
        .subscribe(
            |s: &SettingsState| s.username.clone(),
            |name| println!("  (username is now '{name}')"),
        )
        .await;
    let (theme, _theme_sub) = app
        .settings()
        .subscribe(|s: &SettingsState| s.theme, |theme| println!("  (theme is now {theme})"))
        .await;

    println!("=== Todo App ===");
    println!("Hello, {username}! Theme: {theme}. Type 'help' for commands.\n");
    print_list(&app).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(todo_app::command::CommandError::Empty) => continue,
            Err(error) => {
                println!("  {error}");
                continue;
            }
        };

        tracing::debug!(?command, "Running command");
        match command.run(&app).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::ShowList) => print_list(&app).await,
            Ok(Flow::ShowHelp) => println!("{HELP}"),
            Ok(Flow::Quit) => break,
            Err(error) => println!("  {error}"),
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn print_list(app: &TodoApp) {
    let todos = app.todos().snapshot().await;
    let visible = app.visible_todos().await;

    println!("{}", view::status_line(&todos, visible.len()));
    for (position, todo) in visible.iter().enumerate() {
        println!("{}", render_line(position + 1, todo));
    }
}

fn render_line(position: usize, todo: &TodoItem) -> String {
    let status = if todo.completed { "✓" } else { " " };
    format!("  {position:>2}. [{status}] {}", todo.text)
}

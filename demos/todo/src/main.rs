//! Interactive to-do list.
//!
//! Reads commands from stdin and re-renders the list on stdout after every
//! action. Logs go to stderr; set `RUST_LOG` to change verbosity.

use anyhow::Context;
use std::io::Write;
use todo::{Config, TodoApp, cli, view};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,composable_todo_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    composable_todo_runtime::metrics::describe_metrics();
    metrics::describe_counter!(todo::app::MALFORMED_ACTIONS, "Wire actions that failed to decode");

    let config = Config::from_env();
    tracing::info!(?config, "Starting todo");

    let app = TodoApp::new(&config);
    app.mount(|state| {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout only loses the view; the next command still runs
        let _ = writeln!(stdout, "\n{}", view::render(state));
        let _ = stdout.flush();
    })
    .await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    cli::run(&app, stdin, &mut stdout)
        .await
        .context("command loop failed")?;

    app.shutdown().await.context("shutdown failed")?;
    tracing::info!("Goodbye");
    Ok(())
}

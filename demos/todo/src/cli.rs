//! Line-oriented command interface.
//!
//! One command per line:
//!
//! ```text
//! add <text>
//! toggle <id>
//! filter <all|active|completed>
//! help
//! quit
//! {"type": "..."}      raw wire action
//! ```

use crate::app::{AppError, TodoApp};
use crate::types::{TodoId, VisibilityFilter};
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Help text printed by `help` and after a bad command
pub const USAGE: &str = "\
commands:
  add <text>                      add a todo
  toggle <id>                     toggle a todo by id
  filter <all|active|completed>   change the visible todos
  {\"type\": ...}                   dispatch a raw action
  help                            show this help
  quit                            exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <text>`
    Add(String),
    /// `toggle <id>`
    Toggle(TodoId),
    /// `filter <name>`
    Filter(VisibilityFilter),
    /// A raw JSON action
    Json(String),
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Why a line is not a [`Command`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    /// Blank line
    #[error("empty command")]
    Empty,

    /// Command is missing its argument
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// `toggle` argument is not a number
    #[error("invalid todo id: {0}")]
    InvalidId(String),

    /// `filter` argument names no filter
    #[error("unknown filter: {0} (expected all, active or completed)")]
    UnknownFilter(String),

    /// First word is not a command
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseCommandError::Empty);
        }
        if line.starts_with('{') {
            return Ok(Self::Json(line.to_string()));
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word {
            "add" if rest.is_empty() => Err(ParseCommandError::MissingArgument("add")),
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" if rest.is_empty() => Err(ParseCommandError::MissingArgument("toggle")),
            "toggle" => rest
                .parse::<u64>()
                .map(|id| Self::Toggle(TodoId::new(id)))
                .map_err(|_| ParseCommandError::InvalidId(rest.to_string())),
            "filter" if rest.is_empty() => Err(ParseCommandError::MissingArgument("filter")),
            "filter" => parse_filter(rest).map(Self::Filter),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseCommandError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_filter(name: &str) -> Result<VisibilityFilter, ParseCommandError> {
    match name.to_ascii_lowercase().as_str() {
        "all" | "show_all" => Ok(VisibilityFilter::ShowAll),
        "active" | "show_active" => Ok(VisibilityFilter::ShowActive),
        "completed" | "show_completed" => Ok(VisibilityFilter::ShowCompleted),
        _ => Err(ParseCommandError::UnknownFilter(name.to_string())),
    }
}

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Stop reading
    Quit,
}

/// Parses and executes one line
///
/// Help and diagnostics go to `output`; the screen itself is re-rendered by
/// whatever renderer is mounted on `app`.
///
/// # Errors
///
/// Returns [`AppError::Command`] for lines that do not parse (the store is
/// not touched), [`AppError::Store`] if the store rejects the action and
/// [`AppError::Io`] if writing to `output` fails.
pub async fn execute<W: Write>(app: &TodoApp, line: &str, output: &mut W) -> Result<Flow, AppError> {
    match line.parse::<Command>()? {
        Command::Add(text) => {
            app.add_todo(text).await?;
        },
        Command::Toggle(id) => app.toggle_todo(id).await?,
        Command::Filter(filter) => app.set_visibility_filter(filter).await?,
        Command::Json(raw) => {
            if !app.dispatch_json(&raw).await? {
                writeln!(output, "ignored action: malformed or id already in use")?;
            }
        },
        Command::Help => writeln!(output, "{USAGE}")?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Runs commands from `input` until end of input or `quit`
///
/// Bad lines are reported on `output` and skipped.
///
/// # Errors
///
/// Returns [`AppError::Io`] on read or write failure and [`AppError::Store`]
/// if the store stops accepting actions.
pub async fn run<R, W>(app: &TodoApp, input: R, output: &mut W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match execute(app, &line, output).await {
            Ok(Flow::Continue) => {},
            Ok(Flow::Quit) => break,
            Err(AppError::Command(ParseCommandError::Empty)) => {},
            Err(AppError::Command(error)) => {
                tracing::debug!(%error, "Rejected command");
                writeln!(output, "error: {error}\n{USAGE}")?;
            },
            Err(error) => return Err(error),
        }
        output.flush()?;
    }

    tracing::debug!("Input closed");
    Ok(())
}

use clap::{Parser, Subcommand, ValueEnum};
use taskboard_core::{tasks::Priority, view::SortBy};

/// CLI surface definition. The board UI is the default; `task` subcommands
/// drive the same store for scripting.
#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    about = "Three-lane priority task board that lives on your machine",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Optional subcommand; defaults to launching the TUI when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive board (press q or Esc to exit).
    Tui,
    /// Print version and exit.
    Version,
    /// Run a storage round-trip health check.
    Health,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage tasks without opening the board.
    #[command(subcommand)]
    Task(TaskCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Print each lane as the board would show it.
    List {
        /// Only print this lane.
        #[arg(long)]
        lane: Option<Priority>,
        /// Sort key (defaults to the configured one).
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Sort descending.
        #[arg(long)]
        desc: bool,
        /// Hide completed tasks.
        #[arg(long)]
        hide_completed: bool,
        /// Hide incomplete tasks.
        #[arg(long)]
        hide_incomplete: bool,
    },
    /// Add a task to a lane.
    Add {
        /// Task text; multiple words are joined with spaces.
        #[arg(required = true)]
        text: Vec<String>,
        /// Lane: high, medium or low.
        #[arg(short, long)]
        priority: Priority,
    },
    /// Flip a task between done and not done.
    Toggle { id: i64 },
    /// Replace a task's text.
    Edit {
        id: i64,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Move a task to another lane.
    Move { id: i64, priority: Priority },
    /// Delete a task.
    Delete { id: i64 },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Date,
    Status,
}

impl From<SortKey> for SortBy {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Priority => SortBy::Priority,
            SortKey::Date => SortBy::Date,
            SortKey::Status => SortBy::Status,
        }
    }
}

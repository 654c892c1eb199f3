use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ExperimentCommands, TaskCommands};

/// Command-line planning board for lab experiments
///
/// labplan organizes each experiment into tasks placed on calendar weeks.
/// Tasks can wait on other tasks of the same experiment, recurring work can be
/// generated from an imported plan template, and a slipped timeline can be
/// shifted in one step. Besides the command line it can run as an MCP (Model
/// Context Protocol) server for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "lp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/labplan/labplan.db
    #[arg(long, global = true, env = "LABPLAN_DATABASE")]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the labplan CLI
///
/// - `experiment`: create, inspect, import plans into and reschedule experiments
/// - `task`: edit individual tasks and their dependencies
/// - `serve`: start the MCP server for AI assistant integration
#[derive(Subcommand)]
pub enum Commands {
    /// Manage experiments
    #[command(alias = "e")]
    Experiment {
        #[command(subcommand)]
        command: ExperimentCommands,
    },
    /// Manage tasks within experiments
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Start the MCP server
    Serve,
}

//! labplan CLI Application
//!
//! Command-line interface and MCP server for the labplan research board.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use labplan_core::{params::ListExperiments, PlannerBuilder};
use log::info;
use mcp::{run_stdio_server, LabplanMcpServer};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let mut builder = PlannerBuilder::new();
    if let Some(path) = database_file {
        builder = builder.with_database_path(path);
    }
    let planner = builder
        .build()
        .await
        .context("Failed to initialize planner")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("labplan started");

    match command {
        Some(Experiment { command }) => {
            Cli::new(planner, renderer)
                .handle_experiment_command(command)
                .await
        }
        Some(Task { command }) => {
            Cli::new(planner, renderer)
                .handle_task_command(command)
                .await
        }
        Some(Serve) => {
            info!("Starting labplan MCP server");
            run_stdio_server(LabplanMcpServer::new(planner))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(planner, renderer)
                .list_experiments(&ListExperiments { archived: false })
                .await
        }
    }
}

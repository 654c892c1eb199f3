//! MCP server implementation for labplan
//!
//! Exposes the planner operations as Model Context Protocol tools over stdio,
//! so AI assistants can draft plans, wire up dependencies and reschedule
//! experiments. Tool output is the same Markdown the CLI renders.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use labplan_core::Planner;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod errors;
pub mod handlers;

pub use handlers::{
    AddTask, CreateExperiment, DeleteExperiment, Dependency, Id, ImportPlan, ListExperiments,
    McpResult, ShiftTimeline, UpdateTask, WeekQuery,
};

/// MCP server for labplan
#[derive(Clone)]
pub struct LabplanMcpServer {
    planner: Arc<Mutex<Planner>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LabplanMcpServer {
    /// Create a new labplan MCP server
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(Mutex::new(planner)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.planner.clone())
    }

    #[tool(
        name = "create_experiment",
        description = "Create a new experiment. Provide a title and a start_date (YYYY-MM-DD; any day of the first week, it is normalized to that week's Sunday). Optionally give a description and an expected end_date. Returns the new experiment ID for adding tasks or importing a plan."
    )]
    async fn create_experiment(&self, params: Parameters<CreateExperiment>) -> McpResult {
        self.handlers().create_experiment(params).await
    }

    #[tool(
        name = "list_experiments",
        description = "List experiments with task counts (total, completed, blocked). Use archived=false (default) for active experiments or archived=true for archived ones."
    )]
    async fn list_experiments(&self, params: Parameters<ListExperiments>) -> McpResult {
        self.handlers().list_experiments(params).await
    }

    #[tool(
        name = "show_experiment",
        description = "Show an experiment with its master plan and every task grouped by week, including each task's state (done, blocked or open), importance and dependencies."
    )]
    async fn show_experiment(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_experiment(params).await
    }

    #[tool(
        name = "archive_experiment",
        description = "Archive an experiment to hide it from the active list. Everything is preserved and can be restored with unarchive_experiment."
    )]
    async fn archive_experiment(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().archive_experiment(params).await
    }

    #[tool(
        name = "unarchive_experiment",
        description = "Restore an archived experiment back to the active list."
    )]
    async fn unarchive_experiment(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().unarchive_experiment(params).await
    }

    #[tool(
        name = "delete_experiment",
        description = "Permanently delete an experiment with its plan and all tasks. Requires confirmed=true. This cannot be undone; consider archive_experiment instead."
    )]
    async fn delete_experiment(&self, params: Parameters<DeleteExperiment>) -> McpResult {
        self.handlers().delete_experiment(params).await
    }

    #[tool(
        name = "add_task",
        description = "Add a task to an experiment by hand. Requires experiment_id and title. Optionally give week (any date within the target week, defaults to the current week), importance (1-5, default 3) and description. New tasks start open and without dependencies."
    )]
    async fn add_task(&self, params: Parameters<AddTask>) -> McpResult {
        self.handlers().add_task(params).await
    }

    #[tool(
        name = "update_task",
        description = "Change a task by ID. Any of title, description, week (any date within the new week), importance (1-5) and completed (true/false) may be given; omitted fields stay unchanged. Completing a task unblocks the tasks waiting on it."
    )]
    async fn update_task(&self, params: Parameters<UpdateTask>) -> McpResult {
        self.handlers().update_task(params).await
    }

    #[tool(
        name = "delete_task",
        description = "Delete a task by ID. Tasks that depended on it are kept and simply lose that dependency."
    )]
    async fn delete_task(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().delete_task(params).await
    }

    #[tool(
        name = "add_dependency",
        description = "Make task_id wait for dependency_id. Both tasks must belong to the same experiment. Edges that would create a cycle (including a task depending on itself) are rejected and nothing changes."
    )]
    async fn add_dependency(&self, params: Parameters<Dependency>) -> McpResult {
        self.handlers().add_dependency(params).await
    }

    #[tool(
        name = "remove_dependency",
        description = "Remove the dependency of task_id on dependency_id if it exists."
    )]
    async fn remove_dependency(&self, params: Parameters<Dependency>) -> McpResult {
        self.handlers().remove_dependency(params).await
    }

    #[tool(
        name = "import_plan",
        description = "Import a master plan into an experiment. plan_json is a JSON array of entries (or an object with a 'tasks' array). Each entry needs a title and week_offset (weeks from the experiment start, may be negative) and may have description, importance (1-5) and recurrence {interval_weeks, duration_weeks}. A recurring entry becomes one task every interval_weeks for duration_weeks, titled 'Title (1)', 'Title (2)', ... With replace=true the previous plan and its incomplete generated tasks are removed first; completed and manually added tasks are kept. Invalid input is rejected as a whole.
        
        Example:
        [
          {\"title\": \"Seed cells\", \"week_offset\": 0, \"importance\": 4},
          {\"title\": \"Passage cells\", \"week_offset\": 1,
           \"recurrence\": {\"interval_weeks\": 1, \"duration_weeks\": 4}}
        ]"
    )]
    async fn import_plan(&self, params: Parameters<ImportPlan>) -> McpResult {
        self.handlers().import_plan(params).await
    }

    #[tool(
        name = "shift_timeline",
        description = "Move every incomplete task of an experiment by a number of weeks (negative moves earlier). Completed tasks stay where they are; the expected end date moves along. All tasks move or none do."
    )]
    async fn shift_timeline(&self, params: Parameters<ShiftTimeline>) -> McpResult {
        self.handlers().shift_timeline(params).await
    }

    #[tool(
        name = "show_week",
        description = "Show the tasks of one week of an experiment, most important first, with blocked flags and the week's offset from the experiment start. date is any day within the week and defaults to today."
    )]
    async fn show_week(&self, params: Parameters<WeekQuery>) -> McpResult {
        self.handlers().show_week(params).await
    }

    #[tool(
        name = "show_blocked",
        description = "List the incomplete tasks of an experiment that are waiting on an incomplete dependency."
    )]
    async fn show_blocked(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_blocked(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for LabplanMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "labplan".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(r#"labplan is a planning board for lab experiments. Each experiment owns a master plan and the tasks generated from it; tasks sit on calendar weeks (Sunday to Saturday) and may wait on other tasks of the same experiment.

## Core Concepts
- **Experiments**: a title, a start week, an optional end week and a status (active/archived)
- **Tasks**: a title, a week, an importance from 1 to 5 and a completed flag
- **Dependencies**: a task is blocked while any task it depends on is incomplete
- **Plan**: template entries placed by week offset from the experiment start, optionally recurring

## Workflow
1. `create_experiment` with a start date
2. `import_plan` to generate the tasks, or `add_task` for one-off work
3. `add_dependency` to order the work; cycles are rejected
4. `show_week` each week and `update_task` with completed=true as work finishes
5. `shift_timeline` when the schedule slips

## Tool Categories
- **Experiments**: create_experiment, list_experiments, show_experiment, archive_experiment, unarchive_experiment, delete_experiment
- **Tasks**: add_task, update_task, delete_task, add_dependency, remove_dependency
- **Schedule**: import_plan, shift_timeline, show_week, show_blocked"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: LabplanMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting labplan MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use labplan_core::PlannerBuilder;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_server_registers_every_tool() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let planner = PlannerBuilder::new()
            .with_database_path(temp_dir.path().join("mcp.db"))
            .build()
            .await
            .expect("Failed to create planner");

        let server = LabplanMcpServer::new(planner);
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "add_dependency",
                "add_task",
                "archive_experiment",
                "create_experiment",
                "delete_experiment",
                "delete_task",
                "import_plan",
                "list_experiments",
                "remove_dependency",
                "shift_timeline",
                "show_blocked",
                "show_experiment",
                "show_week",
                "unarchive_experiment",
                "update_task",
            ]
        );
    }

    #[tokio::test]
    async fn test_tools_render_markdown() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let planner = PlannerBuilder::new()
            .with_database_path(temp_dir.path().join("mcp.db"))
            .build()
            .await
            .expect("Failed to create planner");
        let server = LabplanMcpServer::new(planner);

        let created = server
            .create_experiment(Parameters(handlers::McpParams::from(
                labplan_core::params::CreateExperiment {
                    title: "Knockdown screen".to_string(),
                    start_date: "2024-01-10".to_string(),
                    ..Default::default()
                },
            )))
            .await
            .expect("Tool call failed");
        let text = format!("{:?}", created.content);
        assert!(text.contains("Created experiment with ID: 1"));

        let error = server
            .add_dependency(Parameters(handlers::McpParams::from(
                labplan_core::params::Dependency {
                    task_id: 1,
                    dependency_id: 1,
                },
            )))
            .await
            .expect_err("Missing tasks should be rejected");
        assert!(error.message.contains("Task with ID 1 not found"));
    }
}

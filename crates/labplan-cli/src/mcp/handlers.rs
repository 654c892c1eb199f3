//! MCP tool handlers implementation

use std::sync::Arc;

use labplan_core::{
    display::{CreateResult, DeleteResult, Tasks, UpdateResult},
    params as core, Planner,
};
use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::errors::{not_found, to_mcp_error};

/// Generic MCP wrapper for core parameter types.
///
/// Passes JSON straight through to the wrapped type while exposing its
/// schema, so the core parameter structs need no MCP-specific derives.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> McpParams<T>
where
    T: JsonSchema,
{
    fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

pub type Id = McpParams<core::Id>;
pub type CreateExperiment = McpParams<core::CreateExperiment>;
pub type ListExperiments = McpParams<core::ListExperiments>;
pub type DeleteExperiment = McpParams<core::DeleteExperiment>;
pub type AddTask = McpParams<core::AddTask>;
pub type UpdateTask = McpParams<core::UpdateTask>;
pub type Dependency = McpParams<core::Dependency>;
pub type ImportPlan = McpParams<core::ImportPlan>;
pub type ShiftTimeline = McpParams<core::ShiftTimeline>;
pub type WeekQuery = McpParams<core::WeekQuery>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(body: impl Into<String>) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(body.into())]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    planner: Arc<Mutex<Planner>>,
}

impl McpHandlers {
    pub fn new(planner: Arc<Mutex<Planner>>) -> Self {
        Self { planner }
    }

    pub async fn create_experiment(
        &self,
        Parameters(params): Parameters<CreateExperiment>,
    ) -> McpResult {
        debug!("create_experiment: {params:?}");

        let experiment = self
            .planner
            .lock()
            .await
            .create_experiment(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create experiment", &e))?;

        text(CreateResult::new(experiment).to_string())
    }

    pub async fn list_experiments(
        &self,
        Parameters(params): Parameters<ListExperiments>,
    ) -> McpResult {
        debug!("list_experiments: {params:?}");

        let inner_params = params.as_ref();
        let summaries = self
            .planner
            .lock()
            .await
            .list_experiments_summary(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to list experiments", &e))?;

        let title = match (summaries.is_empty(), inner_params.archived) {
            (true, true) => "No archived experiments found",
            (true, false) => "No active experiments found",
            (false, true) => "Archived Experiments",
            (false, false) => "Active Experiments",
        };
        text(format!("# {title}\n\n{summaries}"))
    }

    pub async fn show_experiment(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_experiment: {params:?}");

        let id = params.as_ref().id;
        let experiment = self
            .planner
            .lock()
            .await
            .get_experiment(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get experiment", &e))?
            .ok_or_else(|| not_found("Experiment", id))?;

        text(experiment.to_string())
    }

    pub async fn archive_experiment(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("archive_experiment: {params:?}");

        let id = params.as_ref().id;
        self.planner
            .lock()
            .await
            .archive_experiment(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to archive experiment", &e))?
            .ok_or_else(|| not_found("Experiment", id))?;

        text(format!(
            "Archived experiment with ID {id}. Use 'unarchive_experiment' to restore it."
        ))
    }

    pub async fn unarchive_experiment(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("unarchive_experiment: {params:?}");

        let id = params.as_ref().id;
        self.planner
            .lock()
            .await
            .unarchive_experiment(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to unarchive experiment", &e))?
            .ok_or_else(|| not_found("Experiment", id))?;

        text(format!(
            "Unarchived experiment with ID {id}. It is active again."
        ))
    }

    pub async fn delete_experiment(
        &self,
        Parameters(params): Parameters<DeleteExperiment>,
    ) -> McpResult {
        debug!("delete_experiment: {params:?}");

        let id = params.as_ref().id;
        let experiment = self
            .planner
            .lock()
            .await
            .delete_experiment(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to delete experiment", &e))?
            .ok_or_else(|| not_found("Experiment", id))?;

        text(format!(
            "{}This action cannot be undone.",
            DeleteResult::new(experiment)
        ))
    }

    pub async fn add_task(&self, Parameters(params): Parameters<AddTask>) -> McpResult {
        debug!("add_task: {params:?}");

        let task = self
            .planner
            .lock()
            .await
            .add_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add task", &e))?;

        text(CreateResult::new(task).to_string())
    }

    pub async fn update_task(&self, Parameters(params): Parameters<UpdateTask>) -> McpResult {
        debug!("update_task: {params:?}");

        let params = params.into_inner();
        let mut changes = Vec::new();
        if params.title.is_some() {
            changes.push("Updated title".to_string());
        }
        if params.description.is_some() {
            changes.push("Updated description".to_string());
        }
        if let Some(week) = &params.week {
            changes.push(format!("Moved to the week of {week}"));
        }
        if let Some(importance) = params.importance {
            changes.push(format!("Set importance to {importance}"));
        }
        match params.completed {
            Some(true) => changes.push("Marked as done".to_string()),
            Some(false) => changes.push("Marked as open".to_string()),
            None => {}
        }

        let task = self
            .planner
            .lock()
            .await
            .update_task(params)
            .await
            .map_err(|e| to_mcp_error("Failed to update task", &e))?;

        text(UpdateResult::with_changes(task, changes).to_string())
    }

    pub async fn delete_task(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("delete_task: {params:?}");

        let task = self
            .planner
            .lock()
            .await
            .delete_task(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to delete task", &e))?;

        text(DeleteResult::new(task).to_string())
    }

    pub async fn add_dependency(&self, Parameters(params): Parameters<Dependency>) -> McpResult {
        debug!("add_dependency: {params:?}");

        let inner_params = params.as_ref();
        let task = self
            .planner
            .lock()
            .await
            .add_dependency(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to add dependency", &e))?;

        let change = format!("Now waits for task {}", inner_params.dependency_id);
        text(UpdateResult::with_changes(task, vec![change]).to_string())
    }

    pub async fn remove_dependency(
        &self,
        Parameters(params): Parameters<Dependency>,
    ) -> McpResult {
        debug!("remove_dependency: {params:?}");

        let inner_params = params.as_ref();
        let task = self
            .planner
            .lock()
            .await
            .remove_dependency(inner_params)
            .await
            .map_err(|e| to_mcp_error("Failed to remove dependency", &e))?;

        let change = format!("No longer waits for task {}", inner_params.dependency_id);
        text(UpdateResult::with_changes(task, vec![change]).to_string())
    }

    pub async fn import_plan(&self, Parameters(params): Parameters<ImportPlan>) -> McpResult {
        debug!(
            "import_plan: experiment {} ({} bytes, replace={})",
            params.as_ref().experiment_id,
            params.as_ref().plan_json.len(),
            params.as_ref().replace
        );

        let report = self
            .planner
            .lock()
            .await
            .import_plan(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to import plan", &e))?;

        text(report.to_string())
    }

    pub async fn shift_timeline(
        &self,
        Parameters(params): Parameters<ShiftTimeline>,
    ) -> McpResult {
        debug!("shift_timeline: {params:?}");

        let weeks = params.as_ref().weeks;
        let experiment = self
            .planner
            .lock()
            .await
            .shift_timeline(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to shift timeline", &e))?;

        let change = format!("Moved incomplete tasks by {weeks} week(s)");
        text(UpdateResult::with_changes(experiment, vec![change]).to_string())
    }

    pub async fn show_week(&self, Parameters(params): Parameters<WeekQuery>) -> McpResult {
        debug!("show_week: {params:?}");

        let board = self
            .planner
            .lock()
            .await
            .week_board(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to show week", &e))?;

        text(board.to_string())
    }

    pub async fn show_blocked(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_blocked: {params:?}");

        let tasks = self
            .planner
            .lock()
            .await
            .blocked_tasks(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list blocked tasks", &e))?;

        text(format!("# Blocked Tasks\n\n{}", Tasks(tasks)))
    }
}

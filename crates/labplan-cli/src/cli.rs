//! Command-line interface definitions and command handlers
//!
//! Argument structs here carry the clap-specific attributes (help text,
//! aliases, flag conflicts) and convert into the interface-agnostic parameter
//! types of `labplan_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```
//!
//! [`Cli`] then runs the planner operation and renders the Markdown produced
//! by the core display types.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use labplan_core::{
    display::{CreateResult, DeleteResult, Tasks, UpdateResult},
    params::*,
    Planner,
};
use log::debug;

use crate::renderer::TerminalRenderer;

// ============================================================================
// Experiment arguments
// ============================================================================

/// Create a new experiment
#[derive(Args)]
pub struct CreateExperimentArgs {
    /// Title of the experiment
    pub title: String,
    /// Start date; any day of the first week works (YYYY-MM-DD)
    #[arg(long, help = "Start date (YYYY-MM-DD), normalized to the Sunday of its week")]
    pub start: String,
    /// Expected end date (YYYY-MM-DD)
    #[arg(long, help = "Optional expected end date (YYYY-MM-DD)")]
    pub end: Option<String>,
    /// Optional description providing more context about the experiment
    #[arg(
        short,
        long,
        help = "Optional description providing more context about the experiment"
    )]
    pub description: Option<String>,
}

impl From<CreateExperimentArgs> for CreateExperiment {
    fn from(val: CreateExperimentArgs) -> Self {
        CreateExperiment {
            title: val.title,
            description: val.description,
            start_date: val.start,
            end_date: val.end,
        }
    }
}

/// List experiments
///
/// Shows active experiments by default, or archived ones with --archived.
#[derive(Args)]
pub struct ListExperimentsArgs {
    #[arg(long, help = "Show archived experiments instead of active ones")]
    pub archived: bool,
}

impl From<ListExperimentsArgs> for ListExperiments {
    fn from(val: ListExperimentsArgs) -> Self {
        ListExperiments {
            archived: val.archived,
        }
    }
}

/// Arguments for commands that only need an experiment or task ID
#[derive(Args)]
pub struct IdArgs {
    #[arg(help = "Unique identifier of the experiment or task")]
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Delete an experiment permanently
#[derive(Args)]
pub struct DeleteExperimentArgs {
    #[arg(help = "Unique identifier of the experiment to permanently delete")]
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeleteExperimentArgs> for DeleteExperiment {
    fn from(val: DeleteExperimentArgs) -> Self {
        DeleteExperiment {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

/// Import a plan template from a JSON file
///
/// The file holds an array of entries (or an object with a `tasks` array),
/// each with a `title`, a `week_offset` from the experiment start and
/// optionally `description`, `importance` and `recurrence`.
#[derive(Args)]
pub struct ImportPlanArgs {
    #[arg(help = "Unique identifier of the experiment receiving the plan")]
    pub experiment_id: u64,
    #[arg(help = "Path to the plan JSON file")]
    pub file: PathBuf,
    #[arg(
        long,
        help = "Replace the existing plan and its incomplete generated tasks"
    )]
    pub replace: bool,
}

/// Shift the incomplete tasks of an experiment by a number of weeks
#[derive(Args)]
pub struct ShiftTimelineArgs {
    #[arg(help = "Unique identifier of the experiment to shift")]
    pub experiment_id: u64,
    #[arg(
        allow_hyphen_values = true,
        help = "Number of weeks to move incomplete tasks (negative moves earlier)"
    )]
    pub weeks: i32,
}

impl From<ShiftTimelineArgs> for ShiftTimeline {
    fn from(val: ShiftTimelineArgs) -> Self {
        ShiftTimeline {
            experiment_id: val.experiment_id,
            weeks: val.weeks,
        }
    }
}

/// Show the tasks of one week
#[derive(Args)]
pub struct WeekArgs {
    #[arg(help = "Unique identifier of the experiment")]
    pub experiment_id: u64,
    #[arg(long, help = "Any date within the week to show (defaults to today)")]
    pub date: Option<String>,
}

impl From<WeekArgs> for WeekQuery {
    fn from(val: WeekArgs) -> Self {
        WeekQuery {
            experiment_id: val.experiment_id,
            date: val.date,
        }
    }
}

#[derive(Subcommand)]
pub enum ExperimentCommands {
    /// Create a new experiment
    #[command(alias = "c")]
    Create(CreateExperimentArgs),
    /// List experiments
    #[command(aliases = ["l", "ls"])]
    List(ListExperimentsArgs),
    /// Show an experiment with its plan and tasks
    #[command(alias = "s")]
    Show(IdArgs),
    /// Archive an experiment
    #[command(alias = "a")]
    Archive(IdArgs),
    /// Restore an archived experiment
    #[command(alias = "u")]
    Unarchive(IdArgs),
    /// Delete an experiment permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteExperimentArgs),
    /// Import a plan template from a JSON file
    #[command(alias = "i")]
    Import(ImportPlanArgs),
    /// Shift the incomplete tasks by a number of weeks
    Shift(ShiftTimelineArgs),
    /// Show the tasks of one week
    #[command(alias = "w")]
    Week(WeekArgs),
    /// List tasks waiting on an incomplete dependency
    #[command(alias = "b")]
    Blocked(IdArgs),
}

// ============================================================================
// Task arguments
// ============================================================================

/// Add a task to an experiment
#[derive(Args)]
pub struct AddTaskArgs {
    #[arg(help = "Unique identifier of the experiment to add the task to")]
    pub experiment_id: u64,
    /// Title of the task
    pub title: String,
    #[arg(
        short,
        long,
        help = "Optional detailed description of what needs to be done"
    )]
    pub description: Option<String>,
    #[arg(short, long, help = "Any date within the task's week (defaults to this week)")]
    pub week: Option<String>,
    #[arg(short, long, help = "Importance from 1 (lowest) to 5 (highest), default 3")]
    pub importance: Option<u8>,
}

impl From<AddTaskArgs> for AddTask {
    fn from(val: AddTaskArgs) -> Self {
        AddTask {
            experiment_id: val.experiment_id,
            title: val.title,
            description: val.description,
            week: val.week,
            importance: val.importance,
        }
    }
}

/// Update a task's details or completion
#[derive(Args)]
pub struct UpdateTaskArgs {
    #[arg(help = "Unique identifier of the task to update")]
    pub id: u64,
    #[arg(short, long, help = "Updated title for the task")]
    pub title: Option<String>,
    #[arg(short, long, help = "Updated description (empty clears it)")]
    pub description: Option<String>,
    #[arg(short, long, help = "Any date within the week to move the task to")]
    pub week: Option<String>,
    #[arg(short, long, help = "Updated importance from 1 to 5")]
    pub importance: Option<u8>,
    #[arg(long, conflicts_with = "undone", help = "Mark the task completed")]
    pub done: bool,
    #[arg(long, help = "Mark the task open again")]
    pub undone: bool,
}

impl UpdateTaskArgs {
    /// Human-readable list of the fields this update touches.
    fn changes(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if self.title.is_some() {
            changes.push("Updated title".to_string());
        }
        if self.description.is_some() {
            changes.push("Updated description".to_string());
        }
        if let Some(week) = &self.week {
            changes.push(format!("Moved to the week of {week}"));
        }
        if let Some(importance) = self.importance {
            changes.push(format!("Set importance to {importance}"));
        }
        if self.done {
            changes.push("Marked as done".to_string());
        }
        if self.undone {
            changes.push("Marked as open".to_string());
        }
        changes
    }
}

impl From<UpdateTaskArgs> for UpdateTask {
    fn from(val: UpdateTaskArgs) -> Self {
        let completed = match (val.done, val.undone) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        UpdateTask {
            id: val.id,
            title: val.title,
            description: val.description,
            week: val.week,
            importance: val.importance,
            completed,
        }
    }
}

/// Add or remove a dependency edge
#[derive(Args)]
pub struct DependencyArgs {
    #[arg(help = "Unique identifier of the task that waits")]
    pub task_id: u64,
    #[arg(help = "Unique identifier of the task that must be completed first")]
    pub dependency_id: u64,
}

impl From<DependencyArgs> for Dependency {
    fn from(val: DependencyArgs) -> Self {
        Dependency {
            task_id: val.task_id,
            dependency_id: val.dependency_id,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to an experiment
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// Show details of a specific task
    #[command(alias = "s")]
    Show(IdArgs),
    /// Update a task's details or completion
    #[command(alias = "u")]
    Update(UpdateTaskArgs),
    /// Delete a task and remove it from other tasks' dependencies
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
    /// Make a task wait for another task
    Depend(DependencyArgs),
    /// Remove a dependency between two tasks
    Undepend(DependencyArgs),
}

// ============================================================================
// Command handlers
// ============================================================================

/// Runs parsed commands against the planner and renders their output.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_experiment_command(&self, command: ExperimentCommands) -> Result<()> {
        match command {
            ExperimentCommands::Create(args) => {
                let experiment = self
                    .planner
                    .create_experiment(&args.into())
                    .await
                    .context("Failed to create experiment")?;
                self.renderer
                    .render(&CreateResult::new(experiment).to_string())
            }
            ExperimentCommands::List(args) => self.list_experiments(&args.into()).await,
            ExperimentCommands::Show(args) => {
                let id = args.id;
                let Some(experiment) = self.planner.get_experiment(&args.into()).await? else {
                    bail!("Experiment with ID {id} not found");
                };
                self.renderer.render(&experiment.to_string())
            }
            ExperimentCommands::Archive(args) => {
                let id = args.id;
                if self.planner.archive_experiment(&args.into()).await?.is_none() {
                    bail!("Experiment with ID {id} not found");
                }
                self.renderer.render(&format!(
                    "Archived experiment with ID: {id}. Use 'lp experiment unarchive {id}' to restore it.\n"
                ))
            }
            ExperimentCommands::Unarchive(args) => {
                let id = args.id;
                if self.planner.unarchive_experiment(&args.into()).await?.is_none() {
                    bail!("Experiment with ID {id} not found");
                }
                self.renderer.render(&format!(
                    "Unarchived experiment with ID: {id}. It is active again.\n"
                ))
            }
            ExperimentCommands::Delete(args) => {
                let id = args.id;
                let Some(experiment) = self.planner.delete_experiment(&args.into()).await? else {
                    bail!("Experiment with ID {id} not found");
                };
                self.renderer
                    .render(&DeleteResult::new(experiment).to_string())
            }
            ExperimentCommands::Import(args) => {
                let plan_json = fs::read_to_string(&args.file).with_context(|| {
                    format!("Failed to read plan file {}", args.file.display())
                })?;
                debug!("Read {} bytes of plan JSON", plan_json.len());
                let report = self
                    .planner
                    .import_plan(&ImportPlan {
                        experiment_id: args.experiment_id,
                        plan_json,
                        replace: args.replace,
                    })
                    .await
                    .context("Failed to import plan")?;
                self.renderer.render(&report.to_string())
            }
            ExperimentCommands::Shift(args) => {
                let weeks = args.weeks;
                let experiment = self
                    .planner
                    .shift_timeline(&args.into())
                    .await
                    .context("Failed to shift timeline")?;
                let change = format!("Moved incomplete tasks by {weeks} week(s)");
                self.renderer
                    .render(&UpdateResult::with_changes(experiment, vec![change]).to_string())
            }
            ExperimentCommands::Week(args) => {
                let board = self.planner.week_board(&args.into()).await?;
                self.renderer.render(&board.to_string())
            }
            ExperimentCommands::Blocked(args) => {
                let tasks = self.planner.blocked_tasks(&args.into()).await?;
                self.renderer
                    .render(&format!("# Blocked Tasks\n\n{}", Tasks(tasks)))
            }
        }
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => {
                let task = self
                    .planner
                    .add_task(&args.into())
                    .await
                    .context("Failed to add task")?;
                self.renderer.render(&CreateResult::new(task).to_string())
            }
            TaskCommands::Show(args) => {
                let id = args.id;
                let Some(task) = self.planner.get_task(&args.into()).await? else {
                    bail!("Task with ID {id} not found");
                };
                self.renderer.render(&task.to_string())
            }
            TaskCommands::Update(args) => {
                let changes = args.changes();
                let task = self
                    .planner
                    .update_task(args.into())
                    .await
                    .context("Failed to update task")?;
                self.renderer
                    .render(&UpdateResult::with_changes(task, changes).to_string())
            }
            TaskCommands::Delete(args) => {
                let task = self.planner.delete_task(&args.into()).await?;
                self.renderer.render(&DeleteResult::new(task).to_string())
            }
            TaskCommands::Depend(args) => {
                let change = format!("Now waits for task {}", args.dependency_id);
                let task = self
                    .planner
                    .add_dependency(&args.into())
                    .await
                    .context("Failed to add dependency")?;
                self.renderer
                    .render(&UpdateResult::with_changes(task, vec![change]).to_string())
            }
            TaskCommands::Undepend(args) => {
                let change = format!("No longer waits for task {}", args.dependency_id);
                let task = self
                    .planner
                    .remove_dependency(&args.into())
                    .await
                    .context("Failed to remove dependency")?;
                self.renderer
                    .render(&UpdateResult::with_changes(task, vec![change]).to_string())
            }
        }
    }

    pub async fn list_experiments(&self, params: &ListExperiments) -> Result<()> {
        let summaries = self.planner.list_experiments_summary(params).await?;
        let title = if params.archived {
            "Archived Experiments"
        } else {
            "Active Experiments"
        };
        self.renderer.render(&format!("# {title}\n\n{summaries}"))
    }
}

//! Parameter structures for labplan operations.
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific dependencies beyond serde. Interface layers wrap them:
//! the CLI converts its clap argument structs into these types, and the MCP
//! server deserializes them directly, with JSON schemas generated behind the
//! `schema` feature.
//!
//! Dates are plain strings here; they are parsed and normalized to their
//! week's Sunday by the planner, so every interface accepts the same date
//! formats.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Generic parameters for operations requiring just an ID.
///
/// Used for operations like show_experiment, archive_experiment and
/// delete_task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateExperiment {
    /// Title of the experiment (required)
    pub title: String,
    /// Optional detailed description of the experiment
    pub description: Option<String>,
    /// Start date (YYYY-MM-DD); normalized to the Sunday of its week
    pub start_date: String,
    /// Optional expected end date (YYYY-MM-DD)
    pub end_date: Option<String>,
}

/// Parameters for listing experiments.
///
/// Controls whether to show archived or active experiments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListExperiments {
    /// Whether to show archived experiments instead of active ones
    #[serde(default)]
    pub archived: bool,
}

/// Parameters for permanently deleting an experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeleteExperiment {
    /// ID of the experiment to delete
    pub id: u64,
    /// Must be true; deletion removes the plan and every task
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for adding a task to an experiment by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddTask {
    /// ID of the experiment to add the task to
    pub experiment_id: u64,
    /// Title of the task (required)
    pub title: String,
    /// Optional detailed description of the task
    pub description: Option<String>,
    /// Any date within the target week (YYYY-MM-DD); defaults to the current week
    pub week: Option<String>,
    /// Importance from 1 to 5; defaults to 3
    pub importance: Option<u8>,
}

/// Parameters for updating an existing task.
///
/// Only the provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateTask {
    /// Task ID to update (required)
    pub id: u64,
    /// Updated title of the task
    pub title: Option<String>,
    /// Updated detailed description of the task
    pub description: Option<String>,
    /// Any date within the week to move the task to (YYYY-MM-DD)
    pub week: Option<String>,
    /// Updated importance from 1 to 5
    pub importance: Option<u8>,
    /// Mark the task completed (true) or open again (false)
    pub completed: Option<bool>,
}

/// Parameters for adding or removing a dependency edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Dependency {
    /// ID of the task that waits
    pub task_id: u64,
    /// ID of the task that must be completed first
    pub dependency_id: u64,
}

/// Parameters for importing a plan template into an experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ImportPlan {
    /// ID of the experiment receiving the plan
    pub experiment_id: u64,
    /// Plan JSON: an array of entries or an object with a `tasks` array. Each
    /// entry has `title`, `week_offset`, and optionally `description`,
    /// `importance` (1-5) and `recurrence` (`interval_weeks`, `duration_weeks`)
    pub plan_json: String,
    /// Replace the existing plan and its incomplete generated tasks
    #[serde(default)]
    pub replace: bool,
}

/// Parameters for shifting an experiment's timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ShiftTimeline {
    /// ID of the experiment to shift
    pub experiment_id: u64,
    /// Number of weeks to move incomplete tasks (negative moves earlier)
    pub weeks: i32,
}

/// Parameters for viewing one week of an experiment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct WeekQuery {
    /// ID of the experiment
    pub experiment_id: u64,
    /// Any date within the week to show (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}

/// Trims a title and rejects it when empty.
pub(crate) fn required_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::invalid_input("title").with_reason("Title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_title_trims() {
        assert_eq!(required_title("  PCR run ").unwrap(), "PCR run");
    }

    #[test]
    fn test_required_title_rejects_blank() {
        match required_title("   ") {
            Err(PlannerError::InvalidInput { field, .. }) => assert_eq!(field, "title"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_import_plan_replace_defaults_to_false() {
        let params: ImportPlan =
            serde_json::from_str(r#"{"experiment_id": 4, "plan_json": "[]"}"#).unwrap();
        assert_eq!(params.experiment_id, 4);
        assert!(!params.replace);
    }

    #[test]
    fn test_delete_requires_explicit_confirmation_field() {
        let params: DeleteExperiment = serde_json::from_str(r#"{"id": 2}"#).unwrap();
        assert!(!params.confirmed);
    }
}

//! Task model definition and related functionality.

use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{PlannerError, Result},
    schedule::WeekId,
};

/// Lowest importance a task can carry.
pub const MIN_IMPORTANCE: u8 = 1;
/// Highest importance a task can carry.
pub const MAX_IMPORTANCE: u8 = 5;
/// Importance assigned when none is given.
pub const DEFAULT_IMPORTANCE: u8 = 3;

fn default_importance() -> u8 {
    DEFAULT_IMPORTANCE
}

/// Checks that `importance` lies within 1–5.
pub fn validate_importance(importance: u8) -> Result<u8> {
    if (MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&importance) {
        Ok(importance)
    } else {
        Err(PlannerError::invalid_input("importance").with_reason(format!(
            "Importance {importance} is out of range. Must be between {MIN_IMPORTANCE} and {MAX_IMPORTANCE}"
        )))
    }
}

/// A unit of work placed on a calendar week within one experiment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: u64,

    /// ID of the owning experiment
    pub experiment_id: u64,

    /// Brief title of the task
    pub title: String,

    /// Detailed multi-line description of the task
    pub description: Option<String>,

    /// Week the task is scheduled in
    pub week_id: WeekId,

    /// Importance from 1 (lowest) to 5 (highest)
    #[serde(default = "default_importance")]
    pub importance: u8,

    /// Whether the task has been completed
    #[serde(default)]
    pub completed: bool,

    /// IDs of tasks in the same experiment whose completion gates this one
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub dependencies: BTreeSet<u64>,

    /// Shared by all instances generated from one recurring plan entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_group_id: Option<Uuid>,

    /// Plan entry this task was generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_task_id: Option<u64>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last updated (UTC)
    pub updated_at: Timestamp,
}

/// A task that has not been persisted yet.
///
/// New tasks always start incomplete and without dependencies.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub week_id: WeekId,
    pub importance: u8,
    pub recurrence_group_id: Option<Uuid>,
    pub plan_task_id: Option<u64>,
}

impl NewTask {
    /// A manually added task with default importance.
    pub fn manual(title: impl Into<String>, week_id: WeekId) -> Self {
        Self {
            title: title.into(),
            description: None,
            week_id,
            importance: DEFAULT_IMPORTANCE,
            recurrence_group_id: None,
            plan_task_id: None,
        }
    }
}

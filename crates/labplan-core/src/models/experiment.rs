//! Experiment model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ExperimentStatus, PlanTaskItem, Task};
use crate::schedule::WeekId;

/// A time-boxed piece of lab work with its master plan and generated tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experiment {
    /// Unique identifier for the experiment
    pub id: u64,

    /// Brief title of the experiment
    pub title: String,

    /// Detailed multi-line description of the experiment
    pub description: Option<String>,

    /// Experiment status
    pub status: ExperimentStatus,

    /// Week the experiment starts in; offset 0 of every plan entry
    pub start_date: WeekId,

    /// Week the experiment is expected to end in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<WeekId>,

    /// Timestamp when the experiment was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the experiment was last updated (UTC)
    pub updated_at: Timestamp,

    /// Master plan entries in import order
    #[serde(default)]
    pub plan: Vec<PlanTaskItem>,

    /// All tasks of the experiment ordered by week, then importance
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Experiment {
    /// Looks up a task of this experiment by ID.
    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Week offset of `week` relative to the experiment start.
    pub fn offset_of(&self, week: WeekId) -> crate::Result<i32> {
        self.start_date.weeks_until(week)
    }
}

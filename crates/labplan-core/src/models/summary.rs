//! Experiment summary types and functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Experiment, ExperimentStatus};
use crate::schedule::{self, WeekId};

/// Summary information about an experiment with task statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Experiment ID
    pub id: u64,
    /// Title of the experiment
    pub title: String,
    /// Detailed multi-line description of the experiment
    pub description: Option<String>,
    /// Experiment status
    pub status: ExperimentStatus,
    /// Week the experiment starts in
    pub start_date: WeekId,
    /// Week the experiment is expected to end in
    pub end_date: Option<WeekId>,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of tasks
    pub total_tasks: u32,
    /// Number of completed tasks
    pub completed_tasks: u32,
    /// Number of incomplete tasks waiting on a dependency
    pub blocked_tasks: u32,
}

impl ExperimentSummary {
    /// Number of tasks not yet completed.
    pub fn pending_tasks(&self) -> u32 {
        self.total_tasks - self.completed_tasks
    }
}

impl From<&Experiment> for ExperimentSummary {
    fn from(experiment: &Experiment) -> Self {
        let total_tasks = experiment.tasks.len() as u32;
        let completed_tasks = experiment
            .tasks
            .iter()
            .filter(|task| task.completed)
            .count() as u32;
        let blocked_tasks = schedule::blocked_task_ids(&experiment.tasks).len() as u32;

        Self {
            id: experiment.id,
            title: experiment.title.clone(),
            description: experiment.description.clone(),
            status: experiment.status,
            start_date: experiment.start_date,
            end_date: experiment.end_date,
            created_at: experiment.created_at,
            updated_at: experiment.updated_at,
            total_tasks,
            completed_tasks,
            blocked_tasks,
        }
    }
}

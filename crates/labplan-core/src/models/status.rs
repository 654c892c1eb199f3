//! Status enumerations for experiments and tasks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Task;

/// Type-safe enumeration of experiment statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentStatus {
    /// Experiment is active and visible on the board
    #[default]
    Active,

    /// Experiment is archived and hidden from normal views
    Archived,
}

impl FromStr for ExperimentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ExperimentStatus::Active),
            "archived" => Ok(ExperimentStatus::Archived),
            _ => Err(format!("Invalid experiment status: {s}")),
        }
    }
}

impl ExperimentStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentStatus::Active => "active",
            ExperimentStatus::Archived => "archived",
        }
    }
}

/// Derived state of a task on the board.
///
/// This is never stored. Blocked status depends on the other tasks of the
/// experiment and is recomputed from the current snapshot every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Task is completed
    Done,

    /// Task has at least one incomplete dependency
    Blocked,

    /// Task can be worked on
    Open,
}

impl TaskState {
    /// Derive the state of `task` against the experiment snapshot `all_tasks`.
    pub fn of(task: &Task, all_tasks: &[Task]) -> Self {
        Self::from_flags(task.completed, crate::schedule::is_blocked(task, all_tasks))
    }

    /// Combine a completion flag with an already derived blocked flag.
    /// Completion wins over blocking.
    pub fn from_flags(completed: bool, blocked: bool) -> Self {
        match (completed, blocked) {
            (true, _) => TaskState::Done,
            (false, true) => TaskState::Blocked,
            (false, false) => TaskState::Open,
        }
    }

    /// Get state with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use labplan_core::models::TaskState;
    ///
    /// assert_eq!(TaskState::Done.with_icon(), "✓ Done");
    /// assert_eq!(TaskState::Blocked.with_icon(), "⧗ Blocked");
    /// assert_eq!(TaskState::Open.with_icon(), "○ Open");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TaskState::Done => "✓ Done",
            TaskState::Blocked => "⧗ Blocked",
            TaskState::Open => "○ Open",
        }
    }
}

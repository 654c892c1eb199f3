//! Week board view types.

use serde::{Deserialize, Serialize};

use super::Task;
use crate::schedule::WeekId;

/// A task as shown on the board, with its derived blocked flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardTask {
    #[serde(flatten)]
    pub task: Task,
    pub blocked: bool,
}

/// The tasks of one experiment scheduled in one calendar week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekBoard {
    /// ID of the experiment
    pub experiment_id: u64,
    /// Title of the experiment
    pub title: String,
    /// The week shown
    pub week: WeekId,
    /// Offset of the week from the experiment start
    pub week_offset: i32,
    /// Tasks of the week, most important first
    pub tasks: Vec<BoardTask>,
}

//! Bulk timeline shifting.

use super::WeekId;
use crate::{error::Result, models::Task};

/// Moves every incomplete task of `experiment_id` by `weeks_delta` weeks.
///
/// Completed tasks and tasks of other experiments are returned unchanged.
/// The whole snapshot is computed before anything is returned, so a week
/// falling outside the supported date range fails the shift as a whole.
pub fn shift_timeline(tasks: &[Task], experiment_id: u64, weeks_delta: i32) -> Result<Vec<Task>> {
    tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            if task.experiment_id == experiment_id && !task.completed {
                task.week_id = task.week_id.offset_by(weeks_delta)?;
            }
            Ok(task)
        })
        .collect()
}

/// Shifts an experiment's end week alongside its tasks.
pub fn shift_end_date(end_date: Option<WeekId>, weeks_delta: i32) -> Result<Option<WeekId>> {
    end_date.map(|week| week.offset_by(weeks_delta)).transpose()
}

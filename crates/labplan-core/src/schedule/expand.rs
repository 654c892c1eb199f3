//! Expansion of plan templates into concrete tasks.

use uuid::Uuid;

use super::WeekId;
use crate::{
    error::{PlannerError, Result},
    models::{NewTask, PlanTaskItem},
};

/// Expands plan entries into tasks scheduled relative to `start`.
///
/// An entry without recurrence yields one task in the week `week_offset`
/// weeks after `start`. A recurring entry yields one task every
/// `interval_weeks` weeks while the distance from its first instance stays
/// below `duration_weeks`; the instances are numbered `"<title> (1)"`,
/// `"<title> (2)"`, ... and share a fresh recurrence group ID.
///
/// Fails on the first entry with an invalid recurrence or a week outside the
/// supported date range, producing no tasks at all.
pub fn expand_plan(entries: &[PlanTaskItem], start: WeekId) -> Result<Vec<NewTask>> {
    let mut tasks = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry.recurrence {
            None => tasks.push(NewTask {
                title: entry.title.clone(),
                description: entry.description.clone(),
                week_id: start.offset_by(entry.week_offset)?,
                importance: entry.importance,
                recurrence_group_id: None,
                plan_task_id: Some(entry.id),
            }),
            Some(recurrence) => {
                let group_id = Uuid::new_v4();
                for (index, relative) in recurrence.relative_offsets()?.enumerate() {
                    let offset = entry.week_offset.checked_add(relative).ok_or_else(|| {
                        PlannerError::invalid_input("week_offset").with_reason(format!(
                            "Offset {} + {relative} overflows",
                            entry.week_offset
                        ))
                    })?;
                    tasks.push(NewTask {
                        title: format!("{} ({})", entry.title, index + 1),
                        description: entry.description.clone(),
                        week_id: start.offset_by(offset)?,
                        importance: entry.importance,
                        recurrence_group_id: Some(group_id),
                        plan_task_id: Some(entry.id),
                    });
                }
            }
        }
    }

    Ok(tasks)
}

//! Display implementations for domain models.
//!
//! All output is Markdown so the CLI can render it in the terminal and the
//! MCP server can hand it to an assistant unchanged.

use std::fmt;

use super::datetime::{LocalDateTime, WeekOffset, WeekRange};
use crate::{
    import::ImportReport,
    models::{
        Experiment, ExperimentStatus, ExperimentSummary, PlanTaskItem, Task, TaskState, WeekBoard,
    },
    schedule,
};

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn write_dependencies(f: &mut fmt::Formatter<'_>, task: &Task) -> fmt::Result {
    if task.dependencies.is_empty() {
        return Ok(());
    }
    let ids: Vec<String> = task.dependencies.iter().map(u64::to_string).collect();
    write!(f, ", after {}", ids.join(", "))
}

/// One-line rendering of a task in a list, given its derived state.
fn write_task_line(f: &mut fmt::Formatter<'_>, task: &Task, state: TaskState) -> fmt::Result {
    write!(
        f,
        "- {}. {} ({}, importance {}",
        task.id,
        task.title,
        state.with_icon(),
        task.importance
    )?;
    write_dependencies(f, task)?;
    writeln!(f, ")")
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Start: week of {}", self.start_date)?;
        if let Some(end) = self.end_date {
            writeln!(f, "- End: week of {end}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !self.plan.is_empty() {
            writeln!(f, "\n## Plan")?;
            writeln!(f)?;
            for item in &self.plan {
                writeln!(f, "- {item}")?;
            }
        }

        if self.tasks.is_empty() {
            writeln!(f, "\nNo tasks in this experiment.")?;
            return Ok(());
        }

        writeln!(f, "\n## Tasks")?;
        let blocked = schedule::blocked_task_ids(&self.tasks);
        let mut current_week = None;
        for task in &self.tasks {
            if current_week != Some(task.week_id) {
                current_week = Some(task.week_id);
                writeln!(f)?;
                match self.offset_of(task.week_id) {
                    Ok(offset) => writeln!(
                        f,
                        "### {} ({})",
                        WeekRange(task.week_id),
                        WeekOffset(offset)
                    )?,
                    Err(_) => writeln!(f, "### {}", WeekRange(task.week_id))?,
                }
                writeln!(f)?;
            }
            let state = TaskState::from_flags(task.completed, blocked.contains(&task.id));
            write_task_line(f, task, state)?;
        }

        Ok(())
    }
}

impl fmt::Display for PlanTaskItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.title, WeekOffset(self.week_offset))?;
        if let Some(recurrence) = self.recurrence {
            write!(
                f,
                ", every {} week(s) for {} week(s)",
                recurrence.interval_weeks, recurrence.duration_weeks
            )?;
        }
        write!(f, ", importance {})", self.importance)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Blocked status needs the experiment snapshot, which a lone task lacks
        let state = TaskState::from_flags(self.completed, false);
        writeln!(f, "### {}. {} ({})", self.id, self.title, state.with_icon())?;
        writeln!(f)?;
        writeln!(f, "- Experiment: {}", self.experiment_id)?;
        writeln!(f, "- Week: {}", WeekRange(self.week_id))?;
        writeln!(f, "- Importance: {}", self.importance)?;
        if !self.dependencies.is_empty() {
            let ids: Vec<String> = self.dependencies.iter().map(u64::to_string).collect();
            writeln!(f, "- Depends on: {}", ids.join(", "))?;
        }
        if let Some(group) = self.recurrence_group_id {
            writeln!(f, "- Recurrence group: {group}")?;
        }
        writeln!(f)?;

        if let Some(desc) = &self.description {
            writeln!(f, "{desc}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for ExperimentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_tasks > 0 {
            format!(" ({}/{})", self.completed_tasks, self.total_tasks)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.title, self.id)?;
        writeln!(f)?;

        if let Some(desc) = &self.description {
            writeln!(f, "- **Description**: {desc}")?;
        }
        writeln!(f, "- **Start**: week of {}", self.start_date)?;
        if let Some(end) = self.end_date {
            writeln!(f, "- **End**: week of {end}")?;
        }
        if self.blocked_tasks > 0 {
            writeln!(f, "- **Blocked**: {} task(s)", self.blocked_tasks)?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for WeekBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {}: {} ({})",
            self.title,
            WeekRange(self.week),
            WeekOffset(self.week_offset)
        )?;
        writeln!(f)?;

        if self.tasks.is_empty() {
            return writeln!(f, "No tasks scheduled this week.");
        }

        for entry in &self.tasks {
            let state = TaskState::from_flags(entry.task.completed, entry.blocked);
            write_task_line(f, &entry.task, state)?;
        }
        Ok(())
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Imported {} plan entries into experiment {}",
            self.plan_items.len(),
            self.experiment_id
        )?;
        writeln!(f)?;
        writeln!(f, "- Tasks created: {}", self.created_tasks.len())?;
        if self.removed_tasks > 0 {
            writeln!(f, "- Replaced tasks removed: {}", self.removed_tasks)?;
        }
        if !self.plan_items.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Plan")?;
            writeln!(f)?;
            for item in &self.plan_items {
                writeln!(f, "- {item}")?;
            }
        }
        Ok(())
    }
}

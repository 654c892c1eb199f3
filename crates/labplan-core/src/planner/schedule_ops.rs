//! Plan import, timeline shifting and week views for the Planner.

use log::info;

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    import::{self, ImportReport},
    models::{BoardTask, Experiment, Task, WeekBoard},
    params::{Id, ImportPlan, ShiftTimeline, WeekQuery},
    schedule::{self, WeekId},
};

impl Planner {
    /// Imports a plan template into an experiment.
    ///
    /// The JSON is sanitized first; the plan entries and every task expanded
    /// from them are then stored in one transaction.
    pub async fn import_plan(&self, params: &ImportPlan) -> Result<ImportReport> {
        let drafts = import::parse_plan_json(&params.plan_json)?;
        let (experiment_id, replace) = (params.experiment_id, params.replace);

        let report = self
            .with_database(move |db| db.import_plan(experiment_id, &drafts, replace))
            .await?;

        info!(
            "Imported {} plan entries into experiment {experiment_id}: {} tasks created, {} replaced",
            report.plan_items.len(),
            report.created_tasks.len(),
            report.removed_tasks
        );
        Ok(report)
    }

    /// Moves every incomplete task of an experiment by the given number of
    /// weeks. Completed tasks stay where they are.
    pub async fn shift_timeline(&self, params: &ShiftTimeline) -> Result<Experiment> {
        let (experiment_id, weeks) = (params.experiment_id, params.weeks);

        let experiment = self
            .with_database(move |db| db.shift_timeline(experiment_id, weeks))
            .await?;

        info!("Shifted timeline of experiment {experiment_id} by {weeks} weeks");
        Ok(experiment)
    }

    /// Shows the tasks of one week of an experiment, most important first,
    /// with their blocked flags.
    pub async fn week_board(&self, params: &WeekQuery) -> Result<WeekBoard> {
        let week = match params.date.as_deref() {
            Some(date) => date.parse::<WeekId>()?,
            None => WeekId::current()?,
        };
        let experiment = self.require_experiment(params.experiment_id).await?;
        let blocked = schedule::blocked_task_ids(&experiment.tasks);
        let week_offset = experiment.offset_of(week)?;

        let mut tasks: Vec<BoardTask> = experiment
            .tasks
            .into_iter()
            .filter(|task| task.week_id == week)
            .map(|task| BoardTask {
                blocked: blocked.contains(&task.id),
                task,
            })
            .collect();
        tasks.sort_by(|a, b| {
            b.task
                .importance
                .cmp(&a.task.importance)
                .then(a.task.id.cmp(&b.task.id))
        });

        Ok(WeekBoard {
            experiment_id: experiment.id,
            title: experiment.title,
            week,
            week_offset,
            tasks,
        })
    }

    /// Lists the incomplete tasks of an experiment that wait on an incomplete
    /// dependency.
    pub async fn blocked_tasks(&self, params: &Id) -> Result<Vec<Task>> {
        let experiment = self.require_experiment(params.id).await?;
        let blocked = schedule::blocked_task_ids(&experiment.tasks);
        Ok(experiment
            .tasks
            .into_iter()
            .filter(|task| blocked.contains(&task.id))
            .collect())
    }

    async fn require_experiment(&self, id: u64) -> Result<Experiment> {
        self.get_experiment(&Id { id })
            .await?
            .ok_or(PlannerError::ExperimentNotFound { id })
    }
}

//! Task and dependency operations for the Planner.

use log::debug;

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    models::{task::validate_importance, NewTask, Task, UpdateTaskRequest, DEFAULT_IMPORTANCE},
    params::{self, AddTask, Dependency, Id, UpdateTask},
    schedule::WeekId,
};

impl Planner {
    /// Adds a task to an experiment by hand. Without a week the task lands
    /// in the current calendar week.
    pub async fn add_task(&self, params: &AddTask) -> Result<Task> {
        let experiment_id = params.experiment_id;
        let week_id = match params.week.as_deref() {
            Some(week) => week.parse::<WeekId>()?,
            None => WeekId::current()?,
        };
        let task = NewTask {
            description: params
                .description
                .clone()
                .filter(|d| !d.trim().is_empty()),
            importance: validate_importance(params.importance.unwrap_or(DEFAULT_IMPORTANCE))?,
            ..NewTask::manual(params::required_title(&params.title)?, week_id)
        };

        debug!("Adding task '{}' to experiment {experiment_id} in week {week_id}", task.title);
        self.with_database(move |db| db.add_task(experiment_id, &task))
            .await
    }

    /// Retrieves a task by its ID.
    pub async fn get_task(&self, params: &Id) -> Result<Option<Task>> {
        let id = params.id;
        self.with_database(move |db| db.get_task(id)).await
    }

    /// Retrieves every task of an experiment.
    pub async fn get_tasks(&self, experiment_id: u64) -> Result<Vec<Task>> {
        self.with_database(move |db| db.get_tasks(experiment_id))
            .await
    }

    /// Applies a partial update to a task.
    pub async fn update_task(&self, params: UpdateTask) -> Result<Task> {
        let id = params.id;
        let request = UpdateTaskRequest::try_from(params)?;
        if request.is_empty() {
            return Err(PlannerError::invalid_input("update")
                .with_reason("No fields to update were given"));
        }
        debug!("Updating task {id}: {request:?}");
        self.with_database(move |db| db.update_task(id, request))
            .await
    }

    /// Deletes a task and strips it from every dependency set. Returns the
    /// deleted task.
    pub async fn delete_task(&self, params: &Id) -> Result<Task> {
        let id = params.id;
        debug!("Deleting task {id}");
        self.with_database(move |db| db.delete_task(id)).await
    }

    /// Makes `task_id` wait for `dependency_id`.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::CycleRejected` if the edge would close a cycle
    /// (including a task depending on itself) and
    /// `PlannerError::CrossExperimentDependency` if the tasks belong to
    /// different experiments. Nothing is written in either case.
    pub async fn add_dependency(&self, params: &Dependency) -> Result<Task> {
        let (task_id, dependency_id) = (params.task_id, params.dependency_id);
        debug!("Adding dependency {task_id} -> {dependency_id}");
        self.with_database(move |db| db.add_dependency(task_id, dependency_id))
            .await
    }

    /// Removes a dependency edge if present.
    pub async fn remove_dependency(&self, params: &Dependency) -> Result<Task> {
        let (task_id, dependency_id) = (params.task_id, params.dependency_id);
        debug!("Removing dependency {task_id} -> {dependency_id}");
        self.with_database(move |db| db.remove_dependency(task_id, dependency_id))
            .await
    }
}

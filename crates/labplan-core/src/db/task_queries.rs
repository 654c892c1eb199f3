//! Task CRUD operations, dependency edges and snapshot loading.

use std::collections::HashMap;

use jiff::Timestamp;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::utils;
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{NewTask, Task, UpdateTaskRequest},
    schedule,
};

const TASK_COLUMNS: &str = "id, experiment_id, title, description, week_id, importance, completed, recurrence_group_id, plan_item_id, created_at, updated_at";
const CHECK_EXPERIMENT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM experiments WHERE id = ?1)";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (experiment_id, title, description, week_id, importance, completed, recurrence_group_id, plan_item_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, ?9)";
const UPDATE_TASK_SQL: &str = "UPDATE tasks SET title = ?1, description = ?2, week_id = ?3, importance = ?4, completed = ?5, updated_at = ?6 WHERE id = ?7";
const TOUCH_EXPERIMENT_SQL: &str = "UPDATE experiments SET updated_at = ?1 WHERE id = ?2";
const SELECT_DEPENDENCIES_BY_EXPERIMENT_SQL: &str = "SELECT d.task_id, d.depends_on FROM task_dependencies d JOIN tasks t ON t.id = d.task_id WHERE t.experiment_id = ?1";
const SELECT_DEPENDENCIES_BY_TASK_SQL: &str =
    "SELECT depends_on FROM task_dependencies WHERE task_id = ?1";
const INSERT_DEPENDENCY_SQL: &str =
    "INSERT OR IGNORE INTO task_dependencies (task_id, depends_on) VALUES (?1, ?2)";
const DELETE_DEPENDENCY_SQL: &str =
    "DELETE FROM task_dependencies WHERE task_id = ?1 AND depends_on = ?2";
const DELETE_TASK_EDGES_SQL: &str =
    "DELETE FROM task_dependencies WHERE task_id = ?1 OR depends_on = ?1";
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";

fn build_task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: utils::id(row, 0)?,
        experiment_id: utils::id(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        week_id: utils::week(row, 4)?,
        importance: row.get(5)?,
        completed: row.get(6)?,
        dependencies: Default::default(),
        recurrence_group_id: utils::optional_uuid(row, 7)?,
        plan_task_id: row.get::<_, Option<i64>>(8)?.map(|id| id as u64),
        created_at: utils::timestamp(row, 9)?,
        updated_at: utils::timestamp(row, 10)?,
    })
}

/// Loads every task of an experiment with its dependency set, ordered by
/// week, then importance (highest first).
pub(crate) fn load_tasks(conn: &Connection, experiment_id: u64) -> Result<Vec<Task>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE experiment_id = ?1 ORDER BY week_id, importance DESC, id"
        ))
        .db_context("Failed to prepare task query")?;
    let mut tasks = stmt
        .query_map(params![experiment_id as i64], build_task_from_row)
        .db_context("Failed to query tasks")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to fetch tasks")?;

    let mut edges = conn
        .prepare(SELECT_DEPENDENCIES_BY_EXPERIMENT_SQL)
        .db_context("Failed to prepare dependency query")?;
    let mut by_task: HashMap<u64, Vec<u64>> = HashMap::new();
    let rows = edges
        .query_map(params![experiment_id as i64], |row| {
            Ok((utils::id(row, 0)?, utils::id(row, 1)?))
        })
        .db_context("Failed to query dependencies")?;
    for edge in rows {
        let (task_id, depends_on) = edge.db_context("Failed to fetch dependency")?;
        by_task.entry(task_id).or_default().push(depends_on);
    }

    for task in &mut tasks {
        if let Some(deps) = by_task.remove(&task.id) {
            task.dependencies.extend(deps);
        }
    }

    Ok(tasks)
}

/// Loads a single task with its dependency set.
pub(crate) fn load_task(conn: &Connection, id: u64) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![id as i64],
            build_task_from_row,
        )
        .optional()
        .db_context("Failed to query task")?;

    let Some(mut task) = task else {
        return Ok(None);
    };

    let mut stmt = conn
        .prepare(SELECT_DEPENDENCIES_BY_TASK_SQL)
        .db_context("Failed to prepare dependency query")?;
    let deps = stmt
        .query_map(params![id as i64], |row| utils::id(row, 0))
        .db_context("Failed to query dependencies")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to fetch dependencies")?;
    task.dependencies.extend(deps);

    Ok(Some(task))
}

fn require_task(conn: &Connection, id: u64) -> Result<Task> {
    load_task(conn, id)?.ok_or(PlannerError::TaskNotFound { id })
}

/// Inserts a new task and returns it as stored.
pub(crate) fn insert_task(
    conn: &Connection,
    experiment_id: u64,
    task: &NewTask,
    now: Timestamp,
) -> Result<Task> {
    let now_str = now.to_string();
    conn.execute(
        INSERT_TASK_SQL,
        params![
            experiment_id as i64,
            &task.title,
            task.description.as_deref(),
            task.week_id.to_string(),
            task.importance,
            task.recurrence_group_id.map(|id| id.to_string()),
            task.plan_task_id.map(|id| id as i64),
            &now_str,
            &now_str
        ],
    )
    .db_context("Failed to insert task")?;

    Ok(Task {
        id: conn.last_insert_rowid() as u64,
        experiment_id,
        title: task.title.clone(),
        description: task.description.clone(),
        week_id: task.week_id,
        importance: task.importance,
        completed: false,
        dependencies: Default::default(),
        recurrence_group_id: task.recurrence_group_id,
        plan_task_id: task.plan_task_id,
        created_at: now,
        updated_at: now,
    })
}

pub(crate) fn touch_experiment(conn: &Connection, experiment_id: u64, now: Timestamp) -> Result<()> {
    conn.execute(
        TOUCH_EXPERIMENT_SQL,
        params![now.to_string(), experiment_id as i64],
    )
    .db_context("Failed to update experiment timestamp")?;
    Ok(())
}

impl super::Database {
    /// Adds a task to the given experiment.
    pub fn add_task(&mut self, experiment_id: u64, task: &NewTask) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(
                CHECK_EXPERIMENT_EXISTS_SQL,
                params![experiment_id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to check experiment existence")?;
        if !exists {
            return Err(PlannerError::ExperimentNotFound { id: experiment_id });
        }

        let now = Timestamp::now();
        let task = insert_task(&tx, experiment_id, task, now)?;
        touch_experiment(&tx, experiment_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Retrieves a task by its ID.
    pub fn get_task(&self, id: u64) -> Result<Option<Task>> {
        load_task(&self.connection, id)
    }

    /// Retrieves all tasks of an experiment.
    pub fn get_tasks(&self, experiment_id: u64) -> Result<Vec<Task>> {
        let exists: bool = self
            .connection
            .query_row(
                CHECK_EXPERIMENT_EXISTS_SQL,
                params![experiment_id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to check experiment existence")?;
        if !exists {
            return Err(PlannerError::ExperimentNotFound { id: experiment_id });
        }
        load_tasks(&self.connection, experiment_id)
    }

    /// Applies a partial update to a task and returns the updated task.
    pub fn update_task(&mut self, id: u64, request: UpdateTaskRequest) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut task = require_task(&tx, id)?;
        if let Some(title) = request.title {
            task.title = title;
        }
        if let Some(description) = request.description {
            task.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(week_id) = request.week_id {
            task.week_id = week_id;
        }
        if let Some(importance) = request.importance {
            task.importance = importance;
        }
        if let Some(completed) = request.completed {
            task.completed = completed;
        }
        task.updated_at = Timestamp::now();

        tx.execute(
            UPDATE_TASK_SQL,
            params![
                &task.title,
                task.description.as_deref(),
                task.week_id.to_string(),
                task.importance,
                task.completed,
                task.updated_at.to_string(),
                id as i64
            ],
        )
        .db_context("Failed to update task")?;
        touch_experiment(&tx, task.experiment_id, task.updated_at)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Deletes a task, removing it from every other task's dependencies.
    /// Dependent tasks are kept. Returns the deleted task.
    pub fn delete_task(&mut self, id: u64) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let task = require_task(&tx, id)?;

        tx.execute(DELETE_TASK_EDGES_SQL, params![id as i64])
            .db_context("Failed to delete task dependencies")?;
        tx.execute(DELETE_TASK_SQL, params![id as i64])
            .db_context("Failed to delete task")?;
        touch_experiment(&tx, task.experiment_id, Timestamp::now())?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(task)
    }

    /// Records that `task_id` depends on `dependency_id`.
    ///
    /// Both tasks must exist and belong to the same experiment, and the edge
    /// must not close a cycle in that experiment's dependency graph. Adding an
    /// edge that already exists is a no-op. Returns the updated task.
    pub fn add_dependency(&mut self, task_id: u64, dependency_id: u64) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let task = require_task(&tx, task_id)?;
        let dependency = require_task(&tx, dependency_id)?;

        if task.experiment_id != dependency.experiment_id {
            warn!(
                "Rejected dependency {task_id} -> {dependency_id}: experiments {} and {} differ",
                task.experiment_id, dependency.experiment_id
            );
            return Err(PlannerError::CrossExperimentDependency {
                task_id,
                dependency_id,
            });
        }

        let snapshot = load_tasks(&tx, task.experiment_id)?;
        if schedule::would_create_cycle(&snapshot, task_id, dependency_id) {
            warn!("Rejected dependency {task_id} -> {dependency_id}: would create a cycle");
            return Err(PlannerError::CycleRejected {
                task_id,
                dependency_id,
            });
        }

        tx.execute(
            INSERT_DEPENDENCY_SQL,
            params![task_id as i64, dependency_id as i64],
        )
        .db_context("Failed to insert dependency")?;
        touch_experiment(&tx, task.experiment_id, Timestamp::now())?;

        let updated = require_task(&tx, task_id)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(updated)
    }

    /// Removes the edge `task_id -> dependency_id` if present and returns the
    /// updated task.
    pub fn remove_dependency(&mut self, task_id: u64, dependency_id: u64) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let task = require_task(&tx, task_id)?;
        let removed = tx
            .execute(
                DELETE_DEPENDENCY_SQL,
                params![task_id as i64, dependency_id as i64],
            )
            .db_context("Failed to delete dependency")?;
        if removed > 0 {
            touch_experiment(&tx, task.experiment_id, Timestamp::now())?;
        }

        let updated = require_task(&tx, task_id)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(updated)
    }
}

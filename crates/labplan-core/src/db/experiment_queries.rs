//! Experiment CRUD operations, plan import and timeline shifting.

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};

use super::{task_queries, utils};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    import::{ImportReport, PlanItemDraft},
    models::{Experiment, ExperimentFilter, ExperimentStatus, PlanTaskItem, Recurrence},
    schedule::{self, WeekId},
};

const EXPERIMENT_COLUMNS: &str =
    "id, title, description, status, start_date, end_date, created_at, updated_at";
const INSERT_EXPERIMENT_SQL: &str = "INSERT INTO experiments (title, description, status, start_date, end_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const CHECK_EXPERIMENT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM experiments WHERE id = ?1)";
const UPDATE_EXPERIMENT_STATUS_SQL: &str =
    "UPDATE experiments SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4";
const UPDATE_EXPERIMENT_END_DATE_SQL: &str =
    "UPDATE experiments SET end_date = ?1, updated_at = ?2 WHERE id = ?3";
const DELETE_EXPERIMENT_EDGES_SQL: &str = "DELETE FROM task_dependencies WHERE task_id IN (SELECT id FROM tasks WHERE experiment_id = ?1)";
const DELETE_EXPERIMENT_TASKS_SQL: &str = "DELETE FROM tasks WHERE experiment_id = ?1";
const DELETE_EXPERIMENT_PLAN_SQL: &str = "DELETE FROM plan_items WHERE experiment_id = ?1";
const DELETE_EXPERIMENT_SQL: &str = "DELETE FROM experiments WHERE id = ?1";
const SELECT_PLAN_SQL: &str = "SELECT id, title, description, week_offset, importance, interval_weeks, duration_weeks FROM plan_items WHERE experiment_id = ?1 ORDER BY item_order, id";
const NEXT_PLAN_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(item_order), -1) + 1 FROM plan_items WHERE experiment_id = ?1";
const INSERT_PLAN_ITEM_SQL: &str = "INSERT INTO plan_items (experiment_id, title, description, week_offset, importance, interval_weeks, duration_weeks, item_order) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const GENERATED_OPEN_TASKS: &str =
    "SELECT id FROM tasks WHERE experiment_id = ?1 AND plan_item_id IS NOT NULL AND completed = 0";
const UPDATE_TASK_WEEK_SQL: &str = "UPDATE tasks SET week_id = ?1, updated_at = ?2 WHERE id = ?3";
const DETACH_PLAN_TASKS_SQL: &str =
    "UPDATE tasks SET plan_item_id = NULL WHERE experiment_id = ?1";

fn build_experiment_from_row(row: &Row) -> rusqlite::Result<Experiment> {
    let status_str: String = row.get(3)?;
    let status = status_str.parse::<ExperimentStatus>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("Invalid experiment status: {status_str}").into(),
        )
    })?;

    Ok(Experiment {
        id: utils::id(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status,
        start_date: utils::week(row, 4)?,
        end_date: utils::optional_week(row, 5)?,
        created_at: utils::timestamp(row, 6)?,
        updated_at: utils::timestamp(row, 7)?,
        plan: Vec::new(),
        tasks: Vec::new(),
    })
}

fn build_plan_item_from_row(row: &Row) -> rusqlite::Result<PlanTaskItem> {
    let interval_weeks: Option<i32> = row.get(5)?;
    let duration_weeks: Option<i32> = row.get(6)?;

    Ok(PlanTaskItem {
        id: utils::id(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        week_offset: row.get(3)?,
        importance: row.get(4)?,
        recurrence: interval_weeks
            .zip(duration_weeks)
            .map(|(interval_weeks, duration_weeks)| Recurrence {
                interval_weeks,
                duration_weeks,
            }),
    })
}

fn load_plan(conn: &Connection, experiment_id: u64) -> Result<Vec<PlanTaskItem>> {
    let mut stmt = conn
        .prepare(SELECT_PLAN_SQL)
        .db_context("Failed to prepare plan query")?;
    let plan = stmt
        .query_map(params![experiment_id as i64], build_plan_item_from_row)
        .db_context("Failed to query plan")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to fetch plan")?;
    Ok(plan)
}

/// Loads an experiment with its plan and tasks eagerly.
fn load_experiment(conn: &Connection, id: u64) -> Result<Option<Experiment>> {
    let experiment = conn
        .query_row(
            &format!("SELECT {EXPERIMENT_COLUMNS} FROM experiments WHERE id = ?1"),
            params![id as i64],
            build_experiment_from_row,
        )
        .optional()
        .db_context("Failed to query experiment")?;

    let Some(mut experiment) = experiment else {
        return Ok(None);
    };
    experiment.plan = load_plan(conn, id)?;
    experiment.tasks = task_queries::load_tasks(conn, id)?;
    Ok(Some(experiment))
}

fn require_experiment(conn: &Connection, id: u64) -> Result<Experiment> {
    load_experiment(conn, id)?.ok_or(PlannerError::ExperimentNotFound { id })
}

impl super::Database {
    /// Creates a new experiment starting in the week of `start_date`.
    pub fn create_experiment(
        &mut self,
        title: &str,
        description: Option<&str>,
        start_date: WeekId,
        end_date: Option<WeekId>,
    ) -> Result<Experiment> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_EXPERIMENT_SQL,
            params![
                title,
                description,
                ExperimentStatus::Active.as_str(),
                start_date.to_string(),
                end_date.map(|week| week.to_string()),
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert experiment")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Experiment {
            id,
            title: title.into(),
            description: description.map(String::from),
            status: ExperimentStatus::Active,
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
            plan: Vec::new(),
            tasks: Vec::new(),
        })
    }

    /// Retrieves an experiment with its plan and tasks.
    pub fn get_experiment(&self, id: u64) -> Result<Option<Experiment>> {
        load_experiment(&self.connection, id)
    }

    /// Lists experiments, newest first, with their plans and tasks.
    pub fn list_experiments(&self, filter: Option<&ExperimentFilter>) -> Result<Vec<Experiment>> {
        let mut query = format!("SELECT {EXPERIMENT_COLUMNS} FROM experiments");
        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(ref title) = f.title_contains {
                conditions.push("title LIKE ?");
                params_vec.push(Box::new(format!("%{title}%")));
            }
            if let Some(status) = f.status {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str()));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut experiments = stmt
            .query_map(&params_refs[..], build_experiment_from_row)
            .db_context("Failed to query experiments")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch experiments")?;

        for experiment in &mut experiments {
            experiment.plan = load_plan(&self.connection, experiment.id)?;
            experiment.tasks = task_queries::load_tasks(&self.connection, experiment.id)?;
        }

        Ok(experiments)
    }

    /// Archives an experiment. Returns `None` if it doesn't exist; archiving
    /// an archived experiment returns it unchanged.
    pub fn archive_experiment(&mut self, id: u64) -> Result<Option<Experiment>> {
        self.set_status(id, ExperimentStatus::Active, ExperimentStatus::Archived)
    }

    /// Restores an archived experiment. Returns `None` if it doesn't exist.
    pub fn unarchive_experiment(&mut self, id: u64) -> Result<Option<Experiment>> {
        self.set_status(id, ExperimentStatus::Archived, ExperimentStatus::Active)
    }

    fn set_status(
        &mut self,
        id: u64,
        from: ExperimentStatus,
        to: ExperimentStatus,
    ) -> Result<Option<Experiment>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            UPDATE_EXPERIMENT_STATUS_SQL,
            params![to.as_str(), Timestamp::now().to_string(), id as i64, from.as_str()],
        )
        .db_context("Failed to update experiment status")?;

        let experiment = load_experiment(&tx, id)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(experiment)
    }

    /// Permanently deletes an experiment with its plan, tasks and
    /// dependency edges. This operation cannot be undone.
    pub fn delete_experiment(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_EXPERIMENT_EXISTS_SQL, params![id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check experiment existence")?;
        if !exists {
            return Err(PlannerError::ExperimentNotFound { id });
        }

        for sql in [
            DELETE_EXPERIMENT_EDGES_SQL,
            DELETE_EXPERIMENT_TASKS_SQL,
            DELETE_EXPERIMENT_PLAN_SQL,
            DELETE_EXPERIMENT_SQL,
        ] {
            tx.execute(sql, params![id as i64])
                .db_context("Failed to delete experiment")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Moves every incomplete task of the experiment, and its end week, by
    /// `weeks` weeks. Either every change is written or none is.
    pub fn shift_timeline(&mut self, experiment_id: u64, weeks: i32) -> Result<Experiment> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let experiment = require_experiment(&tx, experiment_id)?;
        let shifted = schedule::shift_timeline(&experiment.tasks, experiment_id, weeks)?;
        let end_date = schedule::shift_end_date(experiment.end_date, weeks)?;

        let now = Timestamp::now().to_string();
        let mut moved = 0usize;
        for (before, after) in experiment.tasks.iter().zip(&shifted) {
            if before.week_id != after.week_id {
                tx.execute(
                    UPDATE_TASK_WEEK_SQL,
                    params![after.week_id.to_string(), &now, after.id as i64],
                )
                .db_context("Failed to move task")?;
                moved += 1;
            }
        }
        tx.execute(
            UPDATE_EXPERIMENT_END_DATE_SQL,
            params![end_date.map(|week| week.to_string()), &now, experiment_id as i64],
        )
        .db_context("Failed to update experiment end date")?;

        let experiment = require_experiment(&tx, experiment_id)?;
        tx.commit().db_context("Failed to commit transaction")?;

        debug!("Shifted {moved} tasks of experiment {experiment_id} by {weeks} weeks");
        Ok(experiment)
    }

    /// Stores sanitized plan entries and the tasks expanded from them.
    ///
    /// With `replace`, the existing plan is removed first together with its
    /// incomplete generated tasks; completed and manually added tasks stay.
    pub fn import_plan(
        &mut self,
        experiment_id: u64,
        drafts: &[PlanItemDraft],
        replace: bool,
    ) -> Result<ImportReport> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let experiment = require_experiment(&tx, experiment_id)?;

        let mut removed_tasks = 0;
        if replace {
            let delete_edges = format!(
                "DELETE FROM task_dependencies WHERE task_id IN ({GENERATED_OPEN_TASKS}) OR depends_on IN ({GENERATED_OPEN_TASKS})"
            );
            tx.execute(&delete_edges, params![experiment_id as i64])
                .db_context("Failed to delete dependencies of replaced tasks")?;
            removed_tasks = tx
                .execute(
                    &format!("DELETE FROM tasks WHERE id IN ({GENERATED_OPEN_TASKS})"),
                    params![experiment_id as i64],
                )
                .db_context("Failed to delete replaced tasks")?;
            tx.execute(DETACH_PLAN_TASKS_SQL, params![experiment_id as i64])
                .db_context("Failed to detach kept tasks from the plan")?;
            tx.execute(DELETE_EXPERIMENT_PLAN_SQL, params![experiment_id as i64])
                .db_context("Failed to delete plan")?;
        }

        let mut order: i64 = tx
            .query_row(NEXT_PLAN_ORDER_SQL, params![experiment_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to get next plan order")?;

        let mut items = Vec::with_capacity(drafts.len());
        for draft in drafts {
            tx.execute(
                INSERT_PLAN_ITEM_SQL,
                params![
                    experiment_id as i64,
                    &draft.title,
                    draft.description.as_deref(),
                    draft.week_offset,
                    draft.importance,
                    draft.recurrence.map(|r| r.interval_weeks),
                    draft.recurrence.map(|r| r.duration_weeks),
                    order
                ],
            )
            .db_context("Failed to insert plan item")?;
            order += 1;

            items.push(PlanTaskItem {
                id: tx.last_insert_rowid() as u64,
                title: draft.title.clone(),
                description: draft.description.clone(),
                week_offset: draft.week_offset,
                importance: draft.importance,
                recurrence: draft.recurrence,
            });
        }

        let now = Timestamp::now();
        let new_tasks = schedule::expand_plan(&items, experiment.start_date)?;
        let created_tasks = new_tasks
            .iter()
            .map(|task| task_queries::insert_task(&tx, experiment_id, task, now))
            .collect::<Result<Vec<_>>>()?;
        task_queries::touch_experiment(&tx, experiment_id, now)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(ImportReport {
            experiment_id,
            plan_items: items,
            created_tasks,
            removed_tasks,
        })
    }
}

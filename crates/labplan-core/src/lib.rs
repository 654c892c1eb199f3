//! Core library for the labplan lab task-planning board.
//!
//! Experiments own a master plan of template entries and the tasks generated
//! from it. Tasks sit on Sunday-aligned calendar weeks, may depend on other
//! tasks of the same experiment, and are blocked while any dependency is
//! incomplete.
//!
//! - [`schedule`]: the pure dependency and schedule engine (cycle guard,
//!   blocked status, week arithmetic, plan expansion, timeline shift)
//! - [`import`]: sanitization of untrusted plan JSON
//! - [`planner`]: the async application layer, backed by SQLite via [`db`]
//! - [`display`]: Markdown rendering of models and operation results
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use labplan_core::{
//!     params::{CreateExperiment, ImportPlan, WeekQuery},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path("labplan.db")
//!     .build()
//!     .await?;
//!
//! let experiment = planner
//!     .create_experiment(&CreateExperiment {
//!         title: "Cell viability assay".to_string(),
//!         start_date: "2024-01-10".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! planner
//!     .import_plan(&ImportPlan {
//!         experiment_id: experiment.id,
//!         plan_json: r#"[{"title": "Seed plates", "week_offset": 0},
//!                        {"title": "Read plates", "week_offset": 1,
//!                         "recurrence": {"interval_weeks": 1, "duration_weeks": 3}}]"#
//!             .to_string(),
//!         replace: false,
//!     })
//!     .await?;
//!
//! let board = planner
//!     .week_board(&WeekQuery {
//!         experiment_id: experiment.id,
//!         date: Some("2024-01-17".to_string()),
//!     })
//!     .await?;
//! println!("{board}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod import;
pub mod models;
pub mod params;
pub mod planner;
pub mod schedule;

pub use db::Database;
pub use display::{CreateResult, DeleteResult, ExperimentSummaries, Tasks, UpdateResult};
pub use error::{PlannerError, Result};
pub use import::{parse_plan_json, ImportReport, PlanItemDraft};
pub use models::{
    Experiment, ExperimentFilter, ExperimentStatus, ExperimentSummary, NewTask, PlanTaskItem,
    Recurrence, Task, TaskState, UpdateTaskRequest, WeekBoard,
};
pub use params::{
    AddTask, CreateExperiment, DeleteExperiment, Dependency, Id, ImportPlan, ListExperiments,
    ShiftTimeline, UpdateTask, WeekQuery,
};
pub use planner::{Planner, PlannerBuilder};
pub use schedule::WeekId;

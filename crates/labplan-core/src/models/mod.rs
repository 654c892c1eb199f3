//! Data models for experiments, plans and tasks.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping the data structures free of
//! presentation logic.
//!
//! An [`Experiment`] owns an ordered master plan of [`PlanTaskItem`]s and the
//! [`Task`]s generated from it (plus any added by hand). Every week-valued
//! field is a [`WeekId`](crate::schedule::WeekId), so tasks can only ever be
//! placed on a Sunday-aligned calendar week.

pub mod board;
pub mod experiment;
pub mod filters;
pub mod plan_item;
pub mod requests;
pub mod status;
pub mod summary;
pub mod task;


pub use board::{BoardTask, WeekBoard};
pub use experiment::Experiment;
pub use filters::ExperimentFilter;
pub use plan_item::{PlanTaskItem, Recurrence};
pub use requests::UpdateTaskRequest;
pub use status::{ExperimentStatus, TaskState};
pub use summary::ExperimentSummary;
pub use task::{NewTask, Task, DEFAULT_IMPORTANCE, MAX_IMPORTANCE, MIN_IMPORTANCE};

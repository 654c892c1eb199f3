//! The dependency and schedule engine.
//!
//! Everything in this module is synchronous and pure: functions take an
//! explicit snapshot of tasks and return new values without touching storage
//! or ambient state. The [`Planner`](crate::Planner) loads snapshots, calls
//! into the engine and persists the outcome.
//!
//! - [`would_create_cycle`] guards new dependency edges.
//! - [`is_blocked`] and [`blocked_task_ids`] derive blocked status.
//! - [`WeekId`] with [`normalize_to_sunday`], [`week_offset_of`] and
//!   [`date_from_offset`] implement Sunday-based week arithmetic.
//! - [`expand_plan`] turns plan templates into tasks.
//! - [`shift_timeline`] moves incomplete work in bulk.

mod calendar;
mod expand;
mod graph;
mod shift;


pub use calendar::{date_from_offset, normalize_to_sunday, parse_date, week_offset_of, WeekId};
pub use expand::expand_plan;
pub use graph::{blocked_task_ids, is_blocked, remove_task, would_create_cycle};
pub use shift::{shift_end_date, shift_timeline};

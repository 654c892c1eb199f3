//! Markdown display formatting and result wrappers.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! the wrappers here add context such as "Created task with ID: 4" or an
//! empty-collection notice. Output is Markdown, rendered by the CLI through
//! termimad and passed verbatim to MCP clients.
//!
//! - [`collections`]: [`ExperimentSummaries`], [`Tasks`]
//! - [`results`]: [`CreateResult`], [`UpdateResult`], [`DeleteResult`]
//! - [`datetime`]: timestamp and week formatting

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{ExperimentSummaries, Tasks};
pub use datetime::{LocalDateTime, WeekOffset, WeekRange};
pub use results::{CreateResult, DeleteResult, UpdateResult};

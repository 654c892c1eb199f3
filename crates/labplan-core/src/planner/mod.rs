//! High-level planner API for experiments, plans and tasks.
//!
//! The [`Planner`] is the application layer between the interfaces (CLI, MCP)
//! and storage. Each operation opens the database on a blocking worker thread
//! and performs its whole read-modify-write inside one SQLite transaction.
//! Graph and calendar rules come from the pure [`crate::schedule`] engine.
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`experiment_ops`]: Experiment creation, lookup and lifecycle
//! - [`experiment_handlers`]: Summaries and confirmed deletion
//! - [`task_ops`]: Task editing and dependency edges
//! - [`schedule_ops`]: Plan import, timeline shift and week boards
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use labplan_core::{
//!     params::{AddTask, CreateExperiment, Dependency},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path("/tmp/labplan.db")
//!     .build()
//!     .await?;
//!
//! let experiment = planner
//!     .create_experiment(&CreateExperiment {
//!         title: "Western blot".to_string(),
//!         start_date: "2024-01-10".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let lysis = planner
//!     .add_task(&AddTask {
//!         experiment_id: experiment.id,
//!         title: "Prepare lysates".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! let gel = planner
//!     .add_task(&AddTask {
//!         experiment_id: experiment.id,
//!         title: "Run gel".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! // The gel waits for the lysates.
//! planner
//!     .add_dependency(&Dependency {
//!         task_id: gel.id,
//!         dependency_id: lysis.id,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{JoinResultExt, Result},
};

pub mod builder;
pub mod experiment_handlers;
pub mod experiment_ops;
pub mod schedule_ops;
pub mod task_ops;


pub use builder::PlannerBuilder;

/// Main planner interface for managing experiments and their tasks.
#[derive(Debug, Clone)]
pub struct Planner {
    pub(crate) db_path: PathBuf,
}

impl Planner {
    /// Creates a new planner with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Runs `operation` against a fresh connection on a blocking worker.
    async fn with_database<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .join_context()
    }
}

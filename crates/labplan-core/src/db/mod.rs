//! SQLite persistence for experiments, plans and tasks.
//!
//! Every mutating method runs in a single transaction. Composite operations
//! (dependency edges, plan import, timeline shift) load the experiment's task
//! snapshot inside that transaction, hand it to the [`crate::schedule`]
//! engine, and write back the result, so a rejected or failing operation
//! leaves the database untouched.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod experiment_queries;
pub mod migrations;
pub mod task_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

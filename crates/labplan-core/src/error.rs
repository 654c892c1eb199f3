//! Error types for the planner library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all planner operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Experiment not found for the given ID
    #[error("Experiment with ID {id} not found")]
    ExperimentNotFound { id: u64 },
    /// Task not found for the given ID
    #[error("Task with ID {id} not found")]
    TaskNotFound { id: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Date input that cannot be interpreted as a calendar date
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },
    /// Recurrence descriptor that cannot be expanded
    #[error(
        "Invalid recurrence: interval_weeks={interval_weeks}, duration_weeks={duration_weeks} \
         (both must be at least 1)"
    )]
    InvalidRecurrence {
        interval_weeks: i32,
        duration_weeks: i32,
    },
    /// Dependency edge rejected by the cycle guard
    #[error("Task {task_id} cannot depend on task {dependency_id}: the dependency would create a cycle")]
    CycleRejected { task_id: u64, dependency_id: u64 },
    /// Dependency edge between tasks of different experiments
    #[error(
        "Task {task_id} cannot depend on task {dependency_id}: tasks belong to different experiments"
    )]
    CrossExperimentDependency { task_id: u64, dependency_id: u64 },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> PlannerError {
        PlannerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates an invalid date error for the given raw input.
    pub fn invalid_date(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error is a validation failure the user can correct, as
    /// opposed to a storage or environment failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidRecurrence { .. }
                | Self::CycleRejected { .. }
                | Self::CrossExperimentDependency { .. }
                | Self::ExperimentNotFound { .. }
                | Self::TaskNotFound { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::database(message).with_source(e))
    }
}

/// Extension trait for mapping blocking-task join failures.
pub trait JoinResultExt<T> {
    /// Flatten a `spawn_blocking` result into a planner result.
    fn join_context(self) -> Result<T>;
}

impl<T> JoinResultExt<T> for std::result::Result<Result<T>, tokio::task::JoinError> {
    fn join_context(self) -> Result<T> {
        self.map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

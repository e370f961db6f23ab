//! Core error types for rekindle-core.
//!
//! Failures are typed so that callers can distinguish "already done"
//! (duplicate check-in), "fix input" (validation) and "try again"
//! (conflict) without string matching.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for rekindle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An operation referenced an id that does not resolve.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A second check-in was attempted for the same run and calendar day.
    #[error("check-in already recorded for run {run_id} on {date}")]
    DuplicateCheckin { run_id: String, date: NaiveDate },

    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Competing writers raced on the same ledger key.
    #[error("Concurrent write conflict: {0}")]
    Conflict(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] with an owned id.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored entity could not be deserialized
    #[error("Corrupt record in table '{table}': {message}")]
    CorruptRecord { table: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A repair was submitted with no cause tags.
    #[error("A repair needs at least one cause tag")]
    EmptyCauseTags,

    /// A repair was submitted against a pledge that is not slipped.
    #[error("Pledge {pledge_id} is not slipped; nothing to repair")]
    NotSlipped { pledge_id: String },

    /// A ledger mutation targeted a pledge that is not active.
    #[error("Pledge {pledge_id} is {status}, not active")]
    InactivePledge { pledge_id: String, status: String },

    /// Frequency string could not be parsed.
    #[error("Invalid frequency '{0}': expected 'daily', 'weekdays' or 'N/week' with N in 1..=7")]
    InvalidFrequency(String),

    /// Invalid value for a field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(sqlite_err, _msg) => {
                if sqlite_err.code == rusqlite::ErrorCode::DatabaseBusy
                    || sqlite_err.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    CoreError::Conflict("database is locked by another writer".to_string())
                } else {
                    CoreError::Database(DatabaseError::QueryFailed(err.to_string()))
                }
            }
            _ => CoreError::Database(DatabaseError::QueryFailed(err.to_string())),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

//! Core error types for timebox-core.
//!
//! The scheduler itself never fails on overlap: cross-task overlap is returned
//! as conflict data. Errors are reserved for stale input, malformed edits, a
//! rejected edit submission, and configuration I/O.

use std::path::PathBuf;
use thiserror::Error;

use crate::conflict::ConflictReport;

/// Core error type for timebox-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed input rejected before scheduling
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Edit left overlaps against other tasks
    #[error("Conflict error: {0}")]
    Conflict(#[from] ConflictError),

    /// Referenced id is absent from the snapshot
    #[error("Not found: {0}")]
    NotFound(#[from] NotFoundError),

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

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid minute count (duration or break)
    #[error("Invalid value for '{field}': '{value}' is not a non-negative whole number of minutes")]
    InvalidMinutes { field: String, value: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Completed subtasks keep their recorded times
    #[error("Subtask '{0}' is completed and cannot be moved")]
    CompletedSubtask(String),
}

/// An edit submission that would leave the edited task overlapping other tasks.
#[derive(Error, Debug, Clone)]
#[error("task '{task_id}' overlaps {} subtask(s) of other tasks", .blocking.len())]
pub struct ConflictError {
    /// Task whose edit was rejected
    pub task_id: String,
    /// Ids of subtasks outside the task that the edit collides with
    pub blocking: Vec<String>,
    /// Full conflict report over the visible task set after resolution
    pub report: ConflictReport,
}

/// Lookup failures against a snapshot; the caller's input is stale.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("task '{0}' not found")]
    Task(String),

    #[error("subtask '{0}' not found")]
    Subtask(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be resolved or created
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

// error.rs — Error types for the goal subsystem.

use thiserror::Error;

/// Errors that can occur during goal operations.
///
/// Not-found conditions are deliberately absent: operations on an unknown
/// id or index are no-ops, not failures.
#[derive(Debug, Error)]
pub enum GoalError {
    /// User input was rejected before anything was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize goal data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Input rejected by the goal model. Messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a goal title")]
    EmptyTitle,

    #[error("Please enter a goal description")]
    EmptySmallGoalText,

    #[error("Please select a day ('{0}' is not a weekday)")]
    UnknownWeekday(String),
}

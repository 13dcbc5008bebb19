//! Error types for task domain validation and parsing.

use super::TaskStatus;
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty or whitespace only.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty or whitespace only.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The task identifier is not a positive integer.
    #[error("invalid task id '{0}', expected a positive integer")]
    InvalidTaskId(String),

    /// The named field does not exist or cannot be changed after creation.
    #[error("field '{0}' cannot be updated, expected one of: title, description, status")]
    UnsupportedField(String),

    /// The status value is not a member of the status enumeration.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status '{0}', expected one of: {valid}", valid = TaskStatus::describe_all())]
pub struct ParseTaskStatusError(pub String);

impl ParseTaskStatusError {
    /// Returns the statuses that would have been accepted.
    #[must_use]
    pub const fn valid_statuses(&self) -> &'static [TaskStatus] {
        &TaskStatus::ALL
    }
}

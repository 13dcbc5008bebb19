//! Service layer for task creation, retrieval, update and removal.

use crate::task::{
    domain::{NewTask, Task, TaskDomainError, TaskFieldUpdate, TaskId, TaskListing, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
}

impl CreateTaskRequest {
    /// Creates a request from raw, unvalidated text.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Coarse classification of service failures for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// Caller input was rejected.
    Validation,
    /// The task does not exist.
    NotFound,
    /// The stored task could not be decoded.
    CorruptRecord,
    /// The store could not be reached.
    StorageUnavailable,
    /// Anything else.
    Unexpected,
}

/// Service-level errors for task tracking operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Validation(_) => TaskErrorKind::Validation,
            Self::Repository(TaskRepositoryError::NotFound(_)) => TaskErrorKind::NotFound,
            Self::Repository(TaskRepositoryError::CorruptRecord { .. }) => {
                TaskErrorKind::CorruptRecord
            }
            Self::Repository(TaskRepositoryError::StorageUnavailable(_)) => {
                TaskErrorKind::StorageUnavailable
            }
            Self::Repository(TaskRepositoryError::Unexpected(_)) => TaskErrorKind::Unexpected,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task tracking service used by presentation collaborators.
#[derive(Clone)]
pub struct TaskTrackerService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> TaskTrackerService<R>
where
    R: TaskRepository,
{
    /// Creates a new task tracking service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns every status a task may hold, for selection inputs.
    #[must_use]
    pub const fn valid_statuses(&self) -> &'static [TaskStatus] {
        &TaskStatus::ALL
    }

    /// Creates a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] for blank text, before the
    /// store is touched.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let draft = NewTask::from_parts(request.title, request.description)?;
        Ok(self.repository.create(draft).await?)
    }

    /// Lists every task ordered by identifier, with warnings for records
    /// that could not be read.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the store is
    /// unavailable.
    pub async fn list_tasks(&self) -> TaskServiceResult<TaskListing> {
        let mut listing = self.repository.list().await?;
        listing.sort_by_id();
        Ok(listing)
    }

    /// Retrieves one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task is missing,
    /// corrupt or the store is unavailable.
    pub async fn get_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Replaces one mutable field of a task and returns the updated task.
    ///
    /// A missing task is reported as not found even when the field or value
    /// is also invalid. Invalid input never reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] for unknown or immutable
    /// fields and out-of-range values, and [`TaskServiceError::Repository`]
    /// for missing tasks and storage failures.
    pub async fn update_task_field(
        &self,
        id: TaskId,
        field: &str,
        value: &str,
    ) -> TaskServiceResult<Task> {
        let update = match TaskFieldUpdate::parse(field, value) {
            Ok(update) => update,
            Err(err) => {
                if !self.repository.exists(id).await? {
                    return Err(TaskRepositoryError::NotFound(id).into());
                }
                return Err(err.into());
            }
        };
        Ok(self.repository.update_field(id, update).await?)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the task is missing or
    /// the store is unavailable.
    pub async fn delete_task(&self, id: TaskId) -> TaskServiceResult<()> {
        Ok(self.repository.delete(id).await?)
    }

    /// Probes the store behind the repository.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the probe fails.
    pub async fn health_check(&self) -> TaskServiceResult<()> {
        self.repository.health_check().await.map_err(|err| {
            tracing::warn!("Task store health check failed: {}", err);
            TaskServiceError::from(err)
        })
    }
}

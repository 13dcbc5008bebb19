//! Repository port for task persistence.

use crate::task::domain::{NewTask, Task, TaskFieldUpdate, TaskId, TaskListing};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// All mutation goes through [`TaskRepository::create`] and
/// [`TaskRepository::update_field`], which only accept validated input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Allocates a fresh identifier and stores a new pending task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::StorageUnavailable`] when the store
    /// cannot be reached. An identifier allocated before a failed write is
    /// not reused.
    async fn create(&self, draft: NewTask) -> TaskRepositoryResult<Task>;

    /// Returns every stored task, with warnings for records that could not
    /// be decoded. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::StorageUnavailable`] when the store
    /// cannot be reached. Corrupt records never fail the listing.
    async fn list(&self) -> TaskRepositoryResult<TaskListing>;

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no record exists and
    /// [`TaskRepositoryError::CorruptRecord`] when the record cannot be
    /// decoded.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Task>;

    /// Reports whether a record exists for the identifier.
    async fn exists(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Writes one field of an existing task and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no record exists.
    async fn update_field(
        &self,
        id: TaskId,
        update: TaskFieldUpdate,
    ) -> TaskRepositoryResult<Task>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no record exists.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Probes the backing store.
    async fn health_check(&self) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The record exists but its fields are missing or malformed.
    #[error("corrupt task record '{key}': {reason}")]
    CorruptRecord {
        /// Storage key of the record.
        key: String,
        /// What is wrong with the record.
        reason: String,
    },

    /// The store could not be reached or did not answer in time.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// Any failure not otherwise classified.
    #[error("unexpected persistence error: {0}")]
    Unexpected(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a connectivity failure.
    #[must_use]
    pub fn storage_unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::StorageUnavailable(Arc::new(err))
    }

    /// Wraps an unclassified failure.
    #[must_use]
    pub fn unexpected(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unexpected(Arc::new(err))
    }

    /// Reports a corrupt record.
    #[must_use]
    pub fn corrupt(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::CorruptRecord {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

//! Repository port for owner-scoped task persistence.

use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskChange, TaskDomainError, TaskId, TaskKey};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Every lookup takes a [`TaskKey`], so the ownership filter and the id match
/// happen in the same store operation.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Returns every task owned by `owner` in creation order.
    async fn list_by_owner(&self, owner: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Finds an owned task.
    ///
    /// Returns `None` when no task matches both the identifier and the owner.
    async fn find_owned(&self, key: TaskKey) -> TaskRepositoryResult<Option<Task>>;

    /// Applies `change` to the owned task at time `at` and commits the result
    /// atomically, returning the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the key matches nothing
    /// and [`TaskRepositoryError::Rejected`] when the aggregate refuses the
    /// change. In both cases the stored document is untouched.
    async fn modify(
        &self,
        key: TaskKey,
        change: TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Deletes an owned task together with its sub-tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the key matches nothing.
    async fn delete_owned(&self, key: TaskKey) -> TaskRepositoryResult<()>;

    /// Checks that the backing store answers.
    async fn ping(&self) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// No task matched the identifier and owner.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The aggregate rejected a change.
    #[error(transparent)]
    Rejected(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

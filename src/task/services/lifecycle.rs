//! Service layer for owner-scoped task and sub-task operations.

use crate::identity::domain::UserId;
use crate::task::{
    domain::{SubTask, SubTaskId, Task, TaskChange, TaskDomainError, TaskKey, TaskText},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner: UserId,
    text: String,
}

impl CreateTaskRequest {
    /// Creates a request for a new task owned by `owner`.
    #[must_use]
    pub fn new(owner: UserId, text: impl Into<String>) -> Self {
        Self {
            owner,
            text: text.into(),
        }
    }
}

/// Request payload for appending a sub-task to an owned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddSubTaskRequest {
    key: TaskKey,
    text: String,
}

impl AddSubTaskRequest {
    /// Creates a request for a new sub-task under the task addressed by `key`.
    #[must_use]
    pub fn new(key: TaskKey, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::Rejected(domain) => Self::Domain(domain),
            other => Self::Repository(other),
        }
    }
}

impl TaskLifecycleError {
    /// Returns whether the error means the task or sub-task does not exist
    /// for the caller.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Repository(TaskRepositoryError::NotFound(_))
                | Self::Domain(TaskDomainError::SubTaskNotFound { .. })
        )
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Identifiers tried before a sub-task id collision is reported.
    pub const SUB_TASK_ID_ATTEMPTS: usize = 3;

    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Lists every task owned by `owner` in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn list_tasks(&self, owner: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_by_owner(owner).await?)
    }

    /// Retrieves one owned task.
    ///
    /// Returns `Ok(None)` when the task does not exist or belongs to someone
    /// else.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store fails.
    pub async fn find_task(&self, key: TaskKey) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_owned(key).await?)
    }

    /// Creates an open task with no sub-tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the text is blank and
    /// [`TaskLifecycleError::Repository`] when the store rejects the task.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let text = TaskText::new(request.text)?;
        let task = Task::new(request.owner, text, &*self.clock);
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), owner = %task.owner(), "created task");
        Ok(task)
    }

    /// Appends an open sub-task to an owned task and returns it.
    ///
    /// A generated identifier that collides with one already in the task is
    /// replaced by a fresh one, up to [`Self::SUB_TASK_ID_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] wrapping
    /// [`TaskRepositoryError::NotFound`] when the task is absent for the
    /// owner; the stored task is unchanged on any failure.
    pub async fn add_sub_task(&self, request: AddSubTaskRequest) -> TaskLifecycleResult<SubTask> {
        let text = TaskText::new(request.text)?;
        let mut attempt = 1;
        loop {
            let sub_task = SubTask::new(text.clone());
            let outcome = self
                .repository
                .modify(
                    request.key,
                    TaskChange::AddSubTask(sub_task.clone()),
                    self.clock.utc(),
                )
                .await;
            match outcome {
                Ok(task) => {
                    info!(
                        task_id = %task.id(),
                        sub_task_id = %sub_task.id(),
                        "added sub-task"
                    );
                    return Ok(sub_task);
                }
                Err(TaskRepositoryError::Rejected(TaskDomainError::DuplicateSubTask {
                    ..
                })) if attempt < Self::SUB_TASK_ID_ATTEMPTS => {
                    debug!(task_id = %request.key.task_id(), attempt, "sub-task id collided");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Completes an owned task and every one of its sub-tasks.
    ///
    /// Completing an already completed task succeeds and returns it
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the task is absent for
    /// the owner or the store fails.
    pub async fn complete_task(&self, key: TaskKey) -> TaskLifecycleResult<Task> {
        let task = self
            .repository
            .modify(key, TaskChange::Complete, self.clock.utc())
            .await?;
        info!(task_id = %task.id(), "completed task");
        Ok(task)
    }

    /// Deletes an owned task together with its sub-tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the task is absent for
    /// the owner or the store fails.
    pub async fn delete_task(&self, key: TaskKey) -> TaskLifecycleResult<()> {
        self.repository.delete_owned(key).await?;
        info!(task_id = %key.task_id(), "deleted task");
        Ok(())
    }

    /// Completes one sub-task of an owned task and returns it. The parent
    /// task's completion flag is never changed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the task is absent and
    /// [`TaskLifecycleError::Domain`] with
    /// [`TaskDomainError::SubTaskNotFound`] when the sub-task is absent.
    pub async fn complete_sub_task(
        &self,
        key: TaskKey,
        sub_task_id: &SubTaskId,
    ) -> TaskLifecycleResult<SubTask> {
        let task = self
            .repository
            .modify(
                key,
                TaskChange::CompleteSubTask(sub_task_id.clone()),
                self.clock.utc(),
            )
            .await?;
        let sub_task = task.sub_task(sub_task_id).cloned().ok_or_else(|| {
            TaskDomainError::SubTaskNotFound {
                task_id: task.id(),
                sub_task_id: sub_task_id.clone(),
            }
        })?;
        info!(task_id = %task.id(), %sub_task_id, "completed sub-task");
        Ok(sub_task)
    }

    /// Removes one sub-task from an owned task. Removing a sub-task that does
    /// not exist succeeds without changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the task is absent for
    /// the owner or the store fails.
    pub async fn delete_sub_task(
        &self,
        key: TaskKey,
        sub_task_id: &SubTaskId,
    ) -> TaskLifecycleResult<()> {
        self.repository
            .modify(
                key,
                TaskChange::RemoveSubTask(sub_task_id.clone()),
                self.clock.utc(),
            )
            .await?;
        debug!(task_id = %key.task_id(), %sub_task_id, "removed sub-task");
        Ok(())
    }

    /// Returns whether the task store answers a liveness probe.
    pub async fn store_available(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "task store probe failed");
                false
            }
        }
    }
}

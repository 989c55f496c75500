//! Error types for task domain validation and aggregate rules.

use super::{SubTaskId, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// Task or sub-task text is empty after trimming.
    #[error("text must not be empty")]
    EmptyText,

    /// The sub-task does not exist within the task.
    #[error("sub-task {sub_task_id} not found in task {task_id}")]
    SubTaskNotFound {
        /// Parent task identifier.
        task_id: TaskId,
        /// Missing sub-task identifier.
        sub_task_id: SubTaskId,
    },

    /// A sub-task with the same identifier already exists within the task.
    #[error("sub-task {sub_task_id} already exists in task {task_id}")]
    DuplicateSubTask {
        /// Parent task identifier.
        task_id: TaskId,
        /// Colliding sub-task identifier.
        sub_task_id: SubTaskId,
    },
}

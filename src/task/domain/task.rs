//! Task aggregate root, its embedded sub-tasks, and the changes it accepts.

use super::{SubTaskId, TaskDomainError, TaskId, TaskText};
use crate::identity::domain::UserId;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Checklist item embedded in a task.
///
/// Sub-tasks have no lifecycle outside their parent and are persisted as
/// part of the parent document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    id: SubTaskId,
    text: TaskText,
    completed: bool,
}

impl SubTask {
    /// Creates an open sub-task with a freshly generated identifier.
    #[must_use]
    pub fn new(text: TaskText) -> Self {
        Self::with_id(SubTaskId::generate(), text)
    }

    /// Creates an open sub-task with the given identifier.
    #[must_use]
    pub const fn with_id(id: SubTaskId, text: TaskText) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }

    /// Returns the sub-task identifier.
    #[must_use]
    pub const fn id(&self) -> &SubTaskId {
        &self.id
    }

    /// Returns the sub-task text.
    #[must_use]
    pub const fn text(&self) -> &TaskText {
        &self.text
    }

    /// Returns whether the sub-task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Marks the sub-task completed, returning whether anything changed.
    const fn complete(&mut self) -> bool {
        let changed = !self.completed;
        self.completed = true;
        changed
    }
}

/// Ownership-filtered lookup key: a task identifier paired with the user
/// who must own it.
///
/// Stores resolve a key in one operation, so a task owned by someone else is
/// indistinguishable from one that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    task_id: TaskId,
    owner: UserId,
}

impl TaskKey {
    /// Creates a key for `task_id` owned by `owner`.
    #[must_use]
    pub const fn new(task_id: TaskId, owner: UserId) -> Self {
        Self { task_id, owner }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(self) -> TaskId {
        self.task_id
    }

    /// Returns the required owner.
    #[must_use]
    pub const fn owner(self) -> UserId {
        self.owner
    }
}

/// Read-modify-write change applied to a single task document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    /// Appends a sub-task.
    AddSubTask(SubTask),
    /// Completes the task and every sub-task.
    Complete,
    /// Completes one sub-task; the parent is untouched.
    CompleteSubTask(SubTaskId),
    /// Removes one sub-task if present.
    RemoveSubTask(SubTaskId),
}

/// Sub-second digits kept on task timestamps, matching `timestamptz`.
const TIMESTAMP_PRECISION: u16 = 6;

/// Task aggregate root.
///
/// Timestamps are truncated to microseconds when set, so a task compares
/// equal to its stored copy in every adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: UserId,
    text: TaskText,
    completed: bool,
    sub_tasks: Vec<SubTask>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning user.
    pub owner: UserId,
    /// Persisted text.
    pub text: TaskText,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted sub-tasks in order.
    pub sub_tasks: Vec<SubTask>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new open task with no sub-tasks.
    #[must_use]
    pub fn new(owner: UserId, text: TaskText, clock: &impl Clock) -> Self {
        let timestamp = clock.utc().trunc_subsecs(TIMESTAMP_PRECISION);
        Self {
            id: TaskId::new(),
            owner,
            text,
            completed: false,
            sub_tasks: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            text: data.text,
            completed: data.completed,
            sub_tasks: data.sub_tasks,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the ownership-filtered key for this task.
    #[must_use]
    pub const fn key(&self) -> TaskKey {
        TaskKey::new(self.id, self.owner)
    }

    /// Returns whether `key` addresses this task.
    #[must_use]
    pub fn matches(&self, key: TaskKey) -> bool {
        self.key() == key
    }

    /// Returns the task text.
    #[must_use]
    pub const fn text(&self) -> &TaskText {
        &self.text
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the sub-tasks in insertion order.
    #[must_use]
    pub fn sub_tasks(&self) -> &[SubTask] {
        &self.sub_tasks
    }

    /// Finds a sub-task by identifier.
    #[must_use]
    pub fn sub_task(&self, sub_task_id: &SubTaskId) -> Option<&SubTask> {
        self.sub_tasks
            .iter()
            .find(|sub_task| sub_task.id() == sub_task_id)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a change at time `at`.
    ///
    /// On error the task is left exactly as it was.
    ///
    /// # Errors
    ///
    /// See [`Task::add_sub_task`] and [`Task::complete_sub_task`].
    pub fn apply(
        &mut self,
        change: TaskChange,
        at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        match change {
            TaskChange::AddSubTask(sub_task) => self.add_sub_task(sub_task, at),
            TaskChange::Complete => {
                self.complete(at);
                Ok(())
            }
            TaskChange::CompleteSubTask(sub_task_id) => {
                self.complete_sub_task(&sub_task_id, at)
            }
            TaskChange::RemoveSubTask(sub_task_id) => {
                self.remove_sub_task(&sub_task_id, at);
                Ok(())
            }
        }
    }

    /// Appends an open sub-task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DuplicateSubTask`] if the identifier is
    /// already used within this task.
    pub fn add_sub_task(
        &mut self,
        sub_task: SubTask,
        at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if self.sub_task(sub_task.id()).is_some() {
            return Err(TaskDomainError::DuplicateSubTask {
                task_id: self.id,
                sub_task_id: sub_task.id().clone(),
            });
        }
        self.sub_tasks.push(sub_task);
        self.touch(at);
        Ok(())
    }

    /// Completes the task and cascades completion to every sub-task.
    ///
    /// Completing an already completed task is a successful no-op.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        let mut changed = !self.completed;
        self.completed = true;
        for sub_task in &mut self.sub_tasks {
            changed |= sub_task.complete();
        }
        if changed {
            self.touch(at);
        }
    }

    /// Completes a single sub-task. The parent's completion flag never
    /// changes as a result.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SubTaskNotFound`] when no sub-task has the
    /// identifier.
    pub fn complete_sub_task(
        &mut self,
        sub_task_id: &SubTaskId,
        at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        let task_id = self.id;
        let sub_task = self
            .sub_tasks
            .iter_mut()
            .find(|sub_task| sub_task.id() == sub_task_id)
            .ok_or_else(|| TaskDomainError::SubTaskNotFound {
                task_id,
                sub_task_id: sub_task_id.clone(),
            })?;
        if sub_task.complete() {
            self.touch(at);
        }
        Ok(())
    }

    /// Removes a sub-task, returning whether one was removed. Removing an
    /// unknown identifier is not an error.
    pub fn remove_sub_task(&mut self, sub_task_id: &SubTaskId, at: DateTime<Utc>) -> bool {
        let before = self.sub_tasks.len();
        self.sub_tasks.retain(|sub_task| sub_task.id() != sub_task_id);
        let removed = self.sub_tasks.len() != before;
        if removed {
            self.touch(at);
        }
        removed
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at.trunc_subsecs(TIMESTAMP_PRECISION);
    }
}

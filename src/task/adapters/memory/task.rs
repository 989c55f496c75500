//! In-memory repository for task lists.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::task::{
    domain::{Task, TaskChange, TaskKey},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Tasks are kept in insertion order, which is also creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if tasks.iter().any(|existing| existing.id() == task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn list_by_owner(&self, owner: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(tasks
            .iter()
            .filter(|task| task.owner() == owner)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, key: TaskKey) -> TaskRepositoryResult<Option<Task>> {
        let tasks = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(tasks.iter().find(|task| task.matches(key)).cloned())
    }

    async fn modify(
        &self,
        key: TaskKey,
        change: TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut tasks = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let slot = tasks
            .iter_mut()
            .find(|task| task.matches(key))
            .ok_or(TaskRepositoryError::NotFound(key.task_id()))?;

        // Mutate a copy so a rejected change leaves the stored task intact.
        let mut working = slot.clone();
        working.apply(change, at)?;
        *slot = working.clone();
        Ok(working)
    }

    async fn delete_owned(&self, key: TaskKey) -> TaskRepositoryResult<()> {
        let mut tasks = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let position = tasks
            .iter()
            .position(|task| task.matches(key))
            .ok_or(TaskRepositoryError::NotFound(key.task_id()))?;
        tasks.remove(position);
        Ok(())
    }

    async fn ping(&self) -> TaskRepositoryResult<()> {
        self.state.read().map(|_| ()).map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

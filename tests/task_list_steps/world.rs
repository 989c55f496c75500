//! Shared world state for task list BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use checklist::identity::domain::UserId;
use checklist::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{SubTask, Task, TaskKey},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for task list behaviour tests.
pub struct TaskListWorld {
    pub service: TestTaskService,
    pub users: HashMap<String, UserId>,
    pub task: Option<Task>,
    pub last_sub_task: Option<SubTask>,
    pub last_result: Option<Result<(), TaskLifecycleError>>,
}

impl TaskListWorld {
    /// Creates a world with no users and no tasks.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            users: HashMap::new(),
            task: None,
            last_sub_task: None,
            last_result: None,
        }
    }

    /// Returns the identifier registered for `name`.
    pub fn user(&self, name: &str) -> eyre::Result<UserId> {
        self.users
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("unknown user {name}"))
    }

    /// Returns the scenario task.
    pub fn task(&self) -> eyre::Result<&Task> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre!("missing task in scenario world"))
    }

    /// Addresses the scenario task as user `name`.
    pub fn key_as(&self, name: &str) -> eyre::Result<TaskKey> {
        Ok(TaskKey::new(self.task()?.id(), self.user(name)?))
    }

    /// Reloads the scenario task as its owner.
    pub fn reload(&self) -> eyre::Result<Task> {
        let key = self.task()?.key();
        run_async(self.service.find_task(key))?.ok_or_else(|| eyre!("task vanished"))
    }
}

impl Default for TaskListWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskListWorld {
    TaskListWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

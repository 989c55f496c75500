//! Domain model for per-user task lists.
//!
//! A task owns an ordered list of sub-tasks and is always addressed through
//! its owner. Infrastructure concerns stay outside the domain boundary.

mod error;
mod ids;
mod task;

pub use error::TaskDomainError;
pub use ids::{SubTaskId, TaskId, TaskText};
pub use task::{PersistedTaskData, SubTask, Task, TaskChange, TaskKey};

//! Application services for task list orchestration.

mod lifecycle;

pub use lifecycle::{
    AddSubTaskRequest, CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};

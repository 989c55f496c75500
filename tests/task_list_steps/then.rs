//! Then steps for task list BDD scenarios.

use super::world::{TaskListWorld, run_async};
use checklist::task::{
    domain::SubTask,
    ports::TaskRepositoryError,
    services::TaskLifecycleError,
};
use eyre::{ensure, eyre};
use rstest_bdd_macros::then;

#[then("the task is completed")]
fn task_is_completed(world: &TaskListWorld) -> Result<(), eyre::Report> {
    ensure!(world.reload()?.is_completed(), "task is still open");
    Ok(())
}

#[then("the task is still open")]
fn task_is_open(world: &TaskListWorld) -> Result<(), eyre::Report> {
    ensure!(!world.reload()?.is_completed(), "task was completed");
    Ok(())
}

#[then("every sub-task is completed")]
fn every_sub_task_is_completed(world: &TaskListWorld) -> Result<(), eyre::Report> {
    let task = world.reload()?;
    ensure!(!task.sub_tasks().is_empty(), "task has no sub-tasks");
    ensure!(
        task.sub_tasks().iter().all(SubTask::is_completed),
        "open sub-task remains: {:?}",
        task.sub_tasks()
    );
    Ok(())
}

#[then("the task has {count:usize} sub-tasks")]
fn task_has_sub_tasks(world: &TaskListWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.reload()?.sub_tasks().len();
    ensure!(actual == count, "expected {count} sub-tasks, found {actual}");
    Ok(())
}

#[then("the operation succeeds")]
fn operation_succeeds(world: &TaskListWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Ok(())) => Ok(()),
        other => Err(eyre!("expected success, got {other:?}")),
    }
}

#[then("the operation fails as not found")]
fn operation_fails_as_not_found(world: &TaskListWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(err)) if err.is_not_found() => Ok(()),
        other => Err(eyre!("expected not found, got {other:?}")),
    }
}

#[then(r#""{name}" has no tasks"#)]
fn user_has_no_tasks(world: &TaskListWorld, name: String) -> Result<(), eyre::Report> {
    let tasks = run_async(world.service.list_tasks(world.user(&name)?))?;
    ensure!(tasks.is_empty(), "tasks remain: {tasks:?}");
    Ok(())
}

#[then("deleting the task again fails as not found")]
fn deleting_again_fails(world: &TaskListWorld) -> Result<(), eyre::Report> {
    let key = world.task()?.key();
    let result = run_async(world.service.delete_task(key));
    ensure!(
        matches!(
            result,
            Err(TaskLifecycleError::Repository(TaskRepositoryError::NotFound(_)))
        ),
        "expected not found, got {result:?}"
    );
    Ok(())
}

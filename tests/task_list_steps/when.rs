//! When steps for task list BDD scenarios.

use super::world::{TaskListWorld, run_async};
use checklist::task::{domain::SubTaskId, services::AddSubTaskRequest};
use eyre::eyre;
use rstest_bdd_macros::when;

#[when(r#""{name}" adds the sub-task "{text}" to the task"#)]
fn add_sub_task(world: &mut TaskListWorld, name: String, text: String) -> Result<(), eyre::Report> {
    let key = world.key_as(&name)?;
    let result = run_async(
        world
            .service
            .add_sub_task(AddSubTaskRequest::new(key, text)),
    );
    match result {
        Ok(sub_task) => {
            world.last_sub_task = Some(sub_task);
            world.last_result = Some(Ok(()));
        }
        Err(err) => world.last_result = Some(Err(err)),
    }
    Ok(())
}

#[when(r#""{name}" completes the task"#)]
fn complete_task(world: &mut TaskListWorld, name: String) -> Result<(), eyre::Report> {
    let key = world.key_as(&name)?;
    let result = run_async(world.service.complete_task(key));
    world.last_result = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{name}" completes the last sub-task"#)]
fn complete_last_sub_task(world: &mut TaskListWorld, name: String) -> Result<(), eyre::Report> {
    let key = world.key_as(&name)?;
    let sub_task_id = world
        .last_sub_task
        .as_ref()
        .map(|sub_task| sub_task.id().clone())
        .ok_or_else(|| eyre!("no sub-task has been added"))?;
    let result = run_async(world.service.complete_sub_task(key, &sub_task_id));
    world.last_result = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{name}" deletes the sub-task "{sub_task_id}""#)]
fn delete_sub_task(
    world: &mut TaskListWorld,
    name: String,
    sub_task_id: String,
) -> Result<(), eyre::Report> {
    let key = world.key_as(&name)?;
    let result = run_async(
        world
            .service
            .delete_sub_task(key, &SubTaskId::new(sub_task_id)),
    );
    world.last_result = Some(result);
    Ok(())
}

#[when(r#""{name}" deletes the task"#)]
fn delete_task(world: &mut TaskListWorld, name: String) -> Result<(), eyre::Report> {
    let key = world.key_as(&name)?;
    let result = run_async(world.service.delete_task(key));
    world.last_result = Some(result);
    Ok(())
}

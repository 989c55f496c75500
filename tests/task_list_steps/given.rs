//! Given steps for task list BDD scenarios.

use super::world::{TaskListWorld, run_async};
use checklist::identity::domain::UserId;
use checklist::task::services::CreateTaskRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a user "{name}""#)]
fn a_user(world: &mut TaskListWorld, name: String) {
    world.users.insert(name, UserId::new());
}

#[given(r#""{name}" has a task "{text}""#)]
fn user_has_task(
    world: &mut TaskListWorld,
    name: String,
    text: String,
) -> Result<(), eyre::Report> {
    let owner = world.user(&name)?;
    let task = run_async(
        world
            .service
            .create_task(CreateTaskRequest::new(owner, text)),
    )
    .wrap_err("create scenario task")?;
    world.task = Some(task);
    Ok(())
}

//! Repository behaviour shared by the in-memory and `PostgreSQL` adapters.
//!
//! Each check builds its own users and tasks with fresh identifiers, so the
//! checks can run against a shared database without cleanup.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use checklist::identity::{
    domain::{EmailAddress, PasswordHash, PersistedUserData, User, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use checklist::task::{
    domain::{
        PersistedTaskData, SubTask, SubTaskId, Task, TaskChange, TaskDomainError, TaskId,
        TaskKey, TaskText,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use eyre::{WrapErr, ensure, eyre};
use mockable::DefaultClock;
use std::sync::Arc;

const STORED_HASH: &str = "pbkdf2-sha256:1:00ff:00ff";

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Stores a fresh user and returns its identifier.
pub async fn owner<U: UserRepository>(users: &U) -> eyre::Result<UserId> {
    let id = UserId::new();
    let user = User::from_persisted(PersistedUserData {
        id,
        email: EmailAddress::new(format!("{id}@example.com"))?,
        password_hash: PasswordHash::parse(STORED_HASH)?,
        created_at: base_time(),
    });
    users.store(&user).await.wrap_err("store owner")?;
    Ok(id)
}

/// Builds an open task created `offset_secs` after a fixed base time.
pub fn task_at(owner: UserId, text: &str, offset_secs: i64) -> eyre::Result<Task> {
    let created_at = base_time() + TimeDelta::seconds(offset_secs);
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        owner,
        text: TaskText::new(text)?,
        completed: false,
        sub_tasks: Vec::new(),
        created_at,
        updated_at: created_at,
    }))
}

fn sub_task(id: &str, text: &str) -> eyre::Result<SubTask> {
    Ok(SubTask::with_id(SubTaskId::new(id), TaskText::new(text)?))
}

/// A stored task is visible to its owner and invisible to anyone else.
pub async fn stored_task_is_scoped_to_owner<T, U>(tasks: &T, users: &U) -> eyre::Result<()>
where
    T: TaskRepository,
    U: UserRepository,
{
    let alice = owner(users).await?;
    let bob = owner(users).await?;
    let task = task_at(alice, "Buy milk", 0)?;
    tasks.store(&task).await?;

    let found = tasks.find_owned(task.key()).await?;
    let foreign = tasks.find_owned(TaskKey::new(task.id(), bob)).await?;

    ensure!(found == Some(task), "owner lookup returned {found:?}");
    ensure!(foreign.is_none(), "foreign lookup returned {foreign:?}");
    ensure!(tasks.list_by_owner(bob).await?.is_empty(), "bob sees tasks");
    Ok(())
}

/// Listing returns the owner's tasks in creation order.
pub async fn listing_follows_creation_order<T, U>(tasks: &T, users: &U) -> eyre::Result<()>
where
    T: TaskRepository,
    U: UserRepository,
{
    let alice = owner(users).await?;
    let earlier = task_at(alice, "first", 0)?;
    let later = task_at(alice, "second", 60)?;
    tasks.store(&earlier).await?;
    tasks.store(&later).await?;
    tasks.store(&task_at(owner(users).await?, "elsewhere", 30)?).await?;

    let listed: Vec<TaskId> = tasks
        .list_by_owner(alice)
        .await?
        .iter()
        .map(Task::id)
        .collect();

    ensure!(
        listed == vec![earlier.id(), later.id()],
        "unexpected listing {listed:?}"
    );
    Ok(())
}

/// Modify commits the change and hands back the committed task.
pub async fn modify_commits_change<T, U>(tasks: &T, users: &U) -> eyre::Result<()>
where
    T: TaskRepository,
    U: UserRepository,
{
    let alice = owner(users).await?;
    let task = task_at(alice, "Buy milk", 0)?;
    tasks.store(&task).await?;
    let at = task.created_at() + TimeDelta::minutes(1);

    tasks
        .modify(task.key(), TaskChange::AddSubTask(sub_task("a", "2%")?), at)
        .await?;
    let completed = tasks.modify(task.key(), TaskChange::Complete, at).await?;
    let stored = tasks
        .find_owned(task.key())
        .await?
        .ok_or_else(|| eyre!("task vanished"))?;

    ensure!(completed == stored, "returned task differs from stored task");
    ensure!(stored.is_completed(), "task not completed");
    ensure!(
        stored.sub_tasks().iter().all(SubTask::is_completed),
        "cascade did not reach sub-tasks"
    );
    ensure!(stored.updated_at() == at, "updated_at not advanced");
    Ok(())
}

/// A rejected change leaves the stored document exactly as it was.
pub async fn rejected_modify_is_not_committed<T, U>(tasks: &T, users: &U) -> eyre::Result<()>
where
    T: TaskRepository,
    U: UserRepository,
{
    let alice = owner(users).await?;
    let task = task_at(alice, "Buy milk", 0)?;
    tasks.store(&task).await?;
    let at = task.created_at() + TimeDelta::minutes(1);

    let result = tasks
        .modify(
            task.key(),
            TaskChange::CompleteSubTask(SubTaskId::new("missing")),
            at,
        )
        .await;
    let stored = tasks.find_owned(task.key()).await?;

    ensure!(
        matches!(
            result,
            Err(TaskRepositoryError::Rejected(
                TaskDomainError::SubTaskNotFound { .. }
            ))
        ),
        "expected a rejected change, got {result:?}"
    );
    ensure!(stored == Some(task), "stored task changed");
    Ok(())
}

/// Modify and delete report `NotFound` for keys that match nothing.
pub async fn unknown_keys_are_not_found<T, U>(tasks: &T, users: &U) -> eyre::Result<()>
where
    T: TaskRepository,
    U: UserRepository,
{
    let alice = owner(users).await?;
    let bob = owner(users).await?;
    let task = task_at(alice, "Buy milk", 0)?;
    tasks.store(&task).await?;
    let foreign = TaskKey::new(task.id(), bob);

    let modified = tasks
        .modify(foreign, TaskChange::Complete, task.created_at())
        .await;
    let deleted = tasks.delete_owned(foreign).await;

    ensure!(
        matches!(modified, Err(TaskRepositoryError::NotFound(id)) if id == task.id()),
        "foreign modify returned {modified:?}"
    );
    ensure!(
        matches!(deleted, Err(TaskRepositoryError::NotFound(_))),
        "foreign delete returned {deleted:?}"
    );
    ensure!(
        tasks.find_owned(task.key()).await? == Some(task),
        "task was altered by a foreign caller"
    );
    Ok(())
}

/// Deleting removes the task from lookups and listings.
pub async fn delete_removes_task<T, U>(tasks: &T, users: &U) -> eyre::Result<()>
where
    T: TaskRepository,
    U: UserRepository,
{
    let alice = owner(users).await?;
    let task = task_at(alice, "Buy milk", 0)?;
    tasks.store(&task).await?;

    tasks.delete_owned(task.key()).await?;

    ensure!(tasks.find_owned(task.key()).await?.is_none(), "task still found");
    ensure!(tasks.list_by_owner(alice).await?.is_empty(), "task still listed");
    ensure!(
        matches!(
            tasks.delete_owned(task.key()).await,
            Err(TaskRepositoryError::NotFound(_))
        ),
        "second delete should be not found"
    );
    Ok(())
}

/// Storing the same task twice is rejected.
pub async fn duplicate_task_is_rejected<T, U>(tasks: &T, users: &U) -> eyre::Result<()>
where
    T: TaskRepository,
    U: UserRepository,
{
    let alice = owner(users).await?;
    let task = task_at(alice, "Buy milk", 0)?;
    tasks.store(&task).await?;

    let result = tasks.store(&task).await;

    ensure!(
        matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
        "expected duplicate task, got {result:?}"
    );
    Ok(())
}

/// Email addresses are unique across accounts.
pub async fn duplicate_email_is_rejected<U: UserRepository>(users: &U) -> eyre::Result<()> {
    let first = owner(users).await?;
    let clash = User::from_persisted(PersistedUserData {
        id: UserId::new(),
        email: EmailAddress::new(format!("{first}@example.com"))?,
        password_hash: PasswordHash::parse(STORED_HASH)?,
        created_at: base_time(),
    });

    let result = users.store(&clash).await;
    let found = users.find_by_email(clash.email()).await?;

    ensure!(
        matches!(result, Err(UserRepositoryError::DuplicateEmail(_))),
        "expected duplicate email, got {result:?}"
    );
    ensure!(
        found.map(|user| user.id()) == Some(first),
        "email now resolves to a different user"
    );
    Ok(())
}

/// Tasks stamped by the wall clock come back from the store unchanged, both
/// after creation and after a modification.
pub async fn clock_stamped_task_round_trips<T, U>(tasks: &T, users: &U) -> eyre::Result<()>
where
    T: TaskRepository,
    U: UserRepository,
{
    let alice = owner(users).await?;
    let created = Task::new(alice, TaskText::new("Buy milk")?, &DefaultClock);
    tasks.store(&created).await?;

    let listed = tasks.list_by_owner(alice).await?;
    ensure!(
        listed == vec![created.clone()],
        "listed task differs from the stored one: {listed:?} vs {created:?}"
    );

    let modified = tasks
        .modify(created.key(), TaskChange::Complete, Utc::now())
        .await?;
    let found = tasks.find_owned(created.key()).await?;
    ensure!(
        found.as_ref() == Some(&modified),
        "stored task differs from the modified one: {found:?} vs {modified:?}"
    );
    Ok(())
}

/// A user registered through the wall clock is found exactly as stored.
pub async fn registered_user_round_trips<U: UserRepository>(users: &U) -> eyre::Result<()> {
    let email = EmailAddress::new(format!("{}@example.com", UserId::new()))?;
    let user = User::register(email, PasswordHash::parse(STORED_HASH)?, &DefaultClock);
    users.store(&user).await?;

    let found = users.find_by_email(user.email()).await?;
    ensure!(
        found.as_ref() == Some(&user),
        "found user differs from the stored one: {found:?} vs {user:?}"
    );
    Ok(())
}

/// Concurrent sub-task additions to one task are all kept.
pub async fn concurrent_sub_task_additions_are_all_kept<T, U>(
    tasks: &Arc<T>,
    users: &U,
) -> eyre::Result<()>
where
    T: TaskRepository + 'static,
    U: UserRepository,
{
    const WRITERS: usize = 16;

    let alice = owner(users).await?;
    let task = task_at(alice, "Buy milk", 0)?;
    tasks.store(&task).await?;

    let mut handles = Vec::with_capacity(WRITERS);
    for n in 0..WRITERS {
        let repository = Arc::clone(tasks);
        let key = task.key();
        let at = task.created_at() + TimeDelta::minutes(1);
        handles.push(tokio::spawn(async move {
            let added = SubTask::new(TaskText::new(format!("item {n}"))?);
            repository
                .modify(key, TaskChange::AddSubTask(added), at)
                .await?;
            Ok::<_, eyre::Report>(())
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let stored = tasks
        .find_owned(task.key())
        .await?
        .ok_or_else(|| eyre!("task vanished"))?;
    ensure!(
        stored.sub_tasks().len() == WRITERS,
        "lost updates: {} of {WRITERS} sub-tasks kept",
        stored.sub_tasks().len()
    );
    Ok(())
}

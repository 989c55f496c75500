//! `PostgreSQL` repository implementation for task list storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::database::{PgPool, get_conn_with, run_blocking_with};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{PersistedTaskData, SubTask, Task, TaskChange, TaskId, TaskKey, TaskText},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_by_owner(&self, owner: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_owned(&self, key: TaskKey) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = owned(key)
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn modify(
        &self,
        key: TaskKey,
        change: TaskChange,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let row = owned(key)
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(key.task_id()))?;

                let mut task = row_to_task(row)?;
                task.apply(change, at)?;

                let sub_tasks = serde_json::to_value(task.sub_tasks())
                    .map_err(TaskRepositoryError::persistence)?;
                diesel::update(owned(key))
                    .set((
                        tasks::completed.eq(task.is_completed()),
                        tasks::sub_tasks.eq(sub_tasks),
                        tasks::updated_at.eq(task.updated_at()),
                    ))
                    .execute(tx)?;
                Ok(task)
            })
        })
        .await
    }

    async fn delete_owned(&self, key: TaskKey) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(owned(key)).execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(key.task_id()));
            }
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            diesel::sql_query("SELECT 1").execute(connection)?;
            Ok(())
        })
        .await
    }
}

type OwnedTask = diesel::dsl::Filter<
    diesel::dsl::Filter<tasks::table, diesel::dsl::Eq<tasks::id, uuid::Uuid>>,
    diesel::dsl::Eq<tasks::owner_id, uuid::Uuid>,
>;

fn owned(key: TaskKey) -> OwnedTask {
    tasks::table
        .filter(tasks::id.eq(key.task_id().into_inner()))
        .filter(tasks::owner_id.eq(key.owner().into_inner()))
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let sub_tasks =
        serde_json::to_value(task.sub_tasks()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().into_inner(),
        text: task.text().as_str().to_owned(),
        completed: task.is_completed(),
        sub_tasks,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        text,
        completed,
        sub_tasks: persisted_sub_tasks,
        created_at,
        updated_at,
    } = row;

    let sub_tasks = serde_json::from_value::<Vec<SubTask>>(persisted_sub_tasks)
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: UserId::from_uuid(owner_id),
        text: TaskText::new(text).map_err(TaskRepositoryError::persistence)?,
        completed,
        sub_tasks,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

//! Route handlers.

use super::{
    ApiError, AppState, Authenticated, CredentialsBody, HealthBody, MessageBody, SubTaskBody,
    TaskBody, TextBody, TokenBody,
};
use crate::identity::{
    domain::UserIdentity,
    ports::UserRepository,
    services::{LoginRequest, RegisterRequest},
};
use crate::task::{
    domain::{SubTaskId, TaskId, TaskKey},
    ports::TaskRepository,
    services::{AddSubTaskRequest, CreateTaskRequest},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

type Body<T> = Result<Json<T>, JsonRejection>;

/// Resolves a path identifier into an owner-scoped key. Identifiers that do
/// not parse cannot name any task, so they are reported as missing.
fn task_key(raw: &str, identity: UserIdentity) -> Result<TaskKey, ApiError> {
    let task_id = raw
        .parse::<TaskId>()
        .map_err(|_| ApiError::NotFound(ApiError::TASK_NOT_FOUND))?;
    Ok(TaskKey::new(task_id, identity.user_id()))
}

pub(super) async fn register<T, U>(
    State(state): State<AppState<T, U>>,
    body: Body<CredentialsBody>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let Json(credentials) = body?;
    state
        .accounts()
        .register(RegisterRequest::new(credentials.email, credentials.password))
        .await?;
    Ok((StatusCode::CREATED, Json(MessageBody::new("User created"))))
}

pub(super) async fn login<T, U>(
    State(state): State<AppState<T, U>>,
    body: Body<CredentialsBody>,
) -> Result<Json<TokenBody>, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let Json(credentials) = body?;
    let credential = state
        .accounts()
        .login(LoginRequest::new(credentials.email, credentials.password))
        .await?;
    Ok(Json(TokenBody {
        token: credential.into_inner(),
    }))
}

pub(super) async fn list_tasks<T, U>(
    State(state): State<AppState<T, U>>,
    Authenticated(identity): Authenticated,
) -> Result<Json<Vec<TaskBody>>, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let tasks = state.tasks().list_tasks(identity.user_id()).await?;
    Ok(Json(tasks.iter().map(TaskBody::from).collect()))
}

pub(super) async fn create_task<T, U>(
    State(state): State<AppState<T, U>>,
    Authenticated(identity): Authenticated,
    body: Body<TextBody>,
) -> Result<(StatusCode, Json<TaskBody>), ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let Json(TextBody { text }) = body?;
    let task = state
        .tasks()
        .create_task(CreateTaskRequest::new(identity.user_id(), text))
        .await?;
    Ok((StatusCode::CREATED, Json(TaskBody::from(&task))))
}

pub(super) async fn add_sub_task<T, U>(
    State(state): State<AppState<T, U>>,
    Authenticated(identity): Authenticated,
    Path(task_id): Path<String>,
    body: Body<TextBody>,
) -> Result<(StatusCode, Json<SubTaskBody>), ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let key = task_key(&task_id, identity)?;
    let Json(TextBody { text }) = body?;
    let sub_task = state
        .tasks()
        .add_sub_task(AddSubTaskRequest::new(key, text))
        .await?;
    Ok((StatusCode::CREATED, Json(SubTaskBody::from(&sub_task))))
}

pub(super) async fn complete_task<T, U>(
    State(state): State<AppState<T, U>>,
    Authenticated(identity): Authenticated,
    Path(task_id): Path<String>,
) -> Result<Json<TaskBody>, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let task = state
        .tasks()
        .complete_task(task_key(&task_id, identity)?)
        .await?;
    Ok(Json(TaskBody::from(&task)))
}

pub(super) async fn delete_task<T, U>(
    State(state): State<AppState<T, U>>,
    Authenticated(identity): Authenticated,
    Path(task_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    state
        .tasks()
        .delete_task(task_key(&task_id, identity)?)
        .await?;
    Ok(Json(MessageBody::new("Deleted")))
}

pub(super) async fn complete_sub_task<T, U>(
    State(state): State<AppState<T, U>>,
    Authenticated(identity): Authenticated,
    Path((task_id, sub_task_id)): Path<(String, String)>,
) -> Result<Json<SubTaskBody>, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let sub_task = state
        .tasks()
        .complete_sub_task(task_key(&task_id, identity)?, &SubTaskId::new(sub_task_id))
        .await?;
    Ok(Json(SubTaskBody::from(&sub_task)))
}

pub(super) async fn delete_sub_task<T, U>(
    State(state): State<AppState<T, U>>,
    Authenticated(identity): Authenticated,
    Path((task_id, sub_task_id)): Path<(String, String)>,
) -> Result<Json<MessageBody>, ApiError>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    state
        .tasks()
        .delete_sub_task(task_key(&task_id, identity)?, &SubTaskId::new(sub_task_id))
        .await?;
    Ok(Json(MessageBody::new("Sub-task deleted")))
}

pub(super) async fn health<T, U>(State(state): State<AppState<T, U>>) -> Json<HealthBody>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    Json(HealthBody::new(state.tasks().store_available().await))
}

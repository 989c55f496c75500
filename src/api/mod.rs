//! HTTP surface over the account and task services.
//!
//! Handlers are thin: they resolve the caller through [`Authenticated`],
//! translate wire bodies into service requests, and map service errors onto
//! status codes through [`ApiError`]. Every error body is
//! `{"message": "..."}`.

mod error;
mod extract;
mod handlers;
mod state;
mod types;

pub use error::ApiError;
pub use extract::Authenticated;
pub use state::AppState;
pub use types::{
    CredentialsBody, HealthBody, MessageBody, SubTaskBody, TaskBody, TextBody, TokenBody,
};

use crate::identity::ports::UserRepository;
use crate::task::ports::TaskRepository;
use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the application router with CORS and request tracing layers.
///
/// The task collection is reachable both as `/todo` and `/todo/`.
#[must_use]
pub fn router<T, U>(state: AppState<T, U>) -> Router
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/auth/register", post(handlers::register::<T, U>))
        .route("/auth/login", post(handlers::login::<T, U>))
        .route(
            "/todo",
            get(handlers::list_tasks::<T, U>).post(handlers::create_task::<T, U>),
        )
        .route(
            "/todo/",
            get(handlers::list_tasks::<T, U>).post(handlers::create_task::<T, U>),
        )
        .route(
            "/todo/{task_id}",
            patch(handlers::complete_task::<T, U>).delete(handlers::delete_task::<T, U>),
        )
        .route(
            "/todo/{task_id}/subtask",
            post(handlers::add_sub_task::<T, U>),
        )
        .route(
            "/todo/{task_id}/subtask/{sub_task_id}",
            patch(handlers::complete_sub_task::<T, U>)
                .delete(handlers::delete_sub_task::<T, U>),
        )
        .route("/health", get(handlers::health::<T, U>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

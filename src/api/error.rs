//! Mapping of service errors onto HTTP responses.

use super::MessageBody;
use crate::identity::{
    domain::IdentityDomainError,
    ports::UserRepositoryError,
    services::{AccessError, AccountError},
};
use crate::task::{
    domain::TaskDomainError, ports::TaskRepositoryError, services::TaskLifecycleError,
};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Error returned by every handler. The display text is the client-facing
/// message; internal details are logged before they are dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No credential was presented.
    #[error("Access denied")]
    Unauthenticated,

    /// The presented credential failed verification.
    #[error("Invalid token")]
    InvalidCredential,

    /// The addressed task or sub-task does not exist for the caller.
    #[error("{0}")]
    NotFound(&'static str),

    /// The request body was malformed or failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// An infrastructure failure.
    #[error("Server error")]
    Internal,
}

impl ApiError {
    /// Message used when a task is absent for the caller.
    pub const TASK_NOT_FOUND: &'static str = "Task not found";

    /// Message used when a sub-task is absent from its task.
    pub const SUB_TASK_NOT_FOUND: &'static str = "Sub-task not found";

    /// Returns the status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidCredential | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn internal(err: &dyn std::error::Error) -> Self {
        error!(error = %err, "request failed");
        Self::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageBody::new(self.to_string()))).into_response()
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => Self::Unauthenticated,
            AccessError::InvalidCredential(reason) => {
                debug!(%reason, "rejected credential");
                Self::InvalidCredential
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(reason = %rejection.body_text(), "rejected request body");
        Self::BadRequest(rejection.body_text())
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(TaskDomainError::EmptyText) => {
                Self::BadRequest("Text is required".to_owned())
            }
            TaskLifecycleError::Domain(TaskDomainError::SubTaskNotFound { .. }) => {
                Self::NotFound(Self::SUB_TASK_NOT_FOUND)
            }
            TaskLifecycleError::Repository(TaskRepositoryError::NotFound(_)) => {
                Self::NotFound(Self::TASK_NOT_FOUND)
            }
            other => Self::internal(&other),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Domain(IdentityDomainError::EmptyEmail) => {
                Self::BadRequest("Email is required".to_owned())
            }
            AccountError::Domain(IdentityDomainError::EmptyPassword) => {
                Self::BadRequest("Password is required".to_owned())
            }
            AccountError::Repository(UserRepositoryError::DuplicateEmail(email)) => {
                warn!(%email, "registration rejected: email in use");
                Self::Conflict("User already exists".to_owned())
            }
            AccountError::UserNotFound => Self::BadRequest("User not found".to_owned()),
            AccountError::InvalidCredentials => Self::BadRequest("Invalid credentials".to_owned()),
            other => Self::internal(&other),
        }
    }
}

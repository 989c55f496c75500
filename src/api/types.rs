//! JSON request and response bodies.
//!
//! Identifiers travel as opaque strings under `_id`; other fields are
//! camel-cased.

use crate::task::domain::{SubTask, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Email and password submitted to register or log in.
///
/// Missing fields deserialize as empty strings and are rejected by the
/// account service's presence checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsBody {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Text of a new task or sub-task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    /// Item text.
    #[serde(default)]
    pub text: String,
}

/// Plain message body, used for confirmations and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human-readable message.
    pub message: String,
}

impl MessageBody {
    /// Creates a message body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signed credential returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBody {
    /// Encoded credential to send back in the `Authorization` header.
    pub token: String,
}

/// Wire form of a sub-task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTaskBody {
    /// Sub-task identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Sub-task text.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
}

impl From<&SubTask> for SubTaskBody {
    fn from(sub_task: &SubTask) -> Self {
        Self {
            id: sub_task.id().to_string(),
            text: sub_task.text().to_string(),
            completed: sub_task.is_completed(),
        }
    }
}

/// Wire form of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBody {
    /// Task identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning user identifier.
    pub user_id: String,
    /// Task text.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Sub-tasks in insertion order.
    pub sub_tasks: Vec<SubTaskBody>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskBody {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            user_id: task.owner().to_string(),
            text: task.text().to_string(),
            completed: task.is_completed(),
            sub_tasks: task.sub_tasks().iter().map(SubTaskBody::from).collect(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    /// Always `"OK"` while the process serves requests.
    pub status: String,
    /// Human-readable summary.
    pub message: String,
    /// `"connected"` or `"disconnected"` depending on the task store probe.
    pub database: String,
}

impl HealthBody {
    /// Builds a report for the given store state.
    #[must_use]
    pub fn new(store_connected: bool) -> Self {
        let database = if store_connected {
            "connected"
        } else {
            "disconnected"
        };
        Self {
            status: "OK".to_owned(),
            message: "Server is running".to_owned(),
            database: database.to_owned(),
        }
    }
}

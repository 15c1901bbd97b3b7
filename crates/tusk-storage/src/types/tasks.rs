//! Task types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{TaskId, UserId};

/// Completion state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Complete,
    Incomplete,
}

impl TaskStatus {
    /// Storage and wire form (`"complete"` / `"incomplete"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Complete => "complete",
            TaskStatus::Incomplete => "incomplete",
        }
    }

    /// Parse the wire form; anything else is `None`.
    pub fn parse(raw: &str) -> Option<TaskStatus> {
        match raw {
            "complete" => Some(TaskStatus::Complete),
            "incomplete" => Some(TaskStatus::Incomplete),
            _ => None,
        }
    }
}

/// Task record
#[derive(Clone, Debug)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    pub details: Option<String>,
    pub status: TaskStatus,
    pub time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a task
#[derive(Clone, Debug)]
pub struct CreateTaskParams {
    pub user_id: UserId,
    pub title: String,
    pub details: Option<String>,
    pub status: TaskStatus,
    pub time: Option<DateTime<Utc>>,
}

/// Partial update for a task. `None` fields keep their stored value; there is
/// no way to clear a field back to empty through a patch.
#[derive(Clone, Debug, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub details: Option<String>,
    pub status: Option<TaskStatus>,
    pub time: Option<DateTime<Utc>>,
}

/// Owner-scoped listing filter.
#[derive(Clone, Debug)]
pub struct TaskListQuery {
    pub user_id: UserId,
    pub status: Option<TaskStatus>,
}

//! Task handlers: listing, creation, retrieval, updates and deletion.
//!
//! Every per-task route resolves the record through [`lookup_owned_task`],
//! which fixes the error precedence: an unknown or malformed id is
//! `NotFound`, a task owned by someone else is `Forbidden`, in that order.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tusk_storage::{CreateTaskParams, Task, TaskId, TaskListQuery, TaskPatch, TaskStatus};
use uuid::Uuid;

use crate::error::ApiError;
use crate::response::{self, Envelope, MessageData};
use crate::server::{authorize, Principal, TuskServer};
use crate::validate;

const INVALID_STATUS: &str = "Status must be either 'complete' or 'incomplete'.";

/// Wire form of a task.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskData {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskData {
    fn from(task: Task) -> Self {
        TaskData {
            id: task.id.0.to_string(),
            user_id: task.user_id.0.to_string(),
            title: task.title,
            details: task.details,
            status: task.status,
            time: task.time,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListTasksQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskListData {
    pub tasks: Vec<TaskData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub details: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedTaskData {
    pub message: String,
    pub task: TaskData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub details: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
}

/// List the caller's tasks, optionally filtered by `?status=`.
///
/// An unrecognized status value is ignored rather than rejected, so the
/// caller simply sees the unfiltered list.
pub async fn list_tasks(
    State(server): State<TuskServer>,
    headers: HeaderMap,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Envelope<TaskListData>>, ApiError> {
    let principal = server.authenticate(&headers)?;

    let status = query.status.as_deref().and_then(TaskStatus::parse);
    let tasks = server
        .store
        .list_tasks(&TaskListQuery {
            user_id: principal.user_id.clone(),
            status,
        })
        .await?;

    Ok(Json(response::success(TaskListData {
        tasks: tasks.into_iter().map(TaskData::from).collect(),
    })))
}

/// Create a task owned by the caller.
pub async fn create_task(
    State(server): State<TuskServer>,
    headers: HeaderMap,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Envelope<CreatedTaskData>>), ApiError> {
    let principal = server.authenticate(&headers)?;

    let title = req.title.as_deref().unwrap_or("");
    if !validate::valid_title(title) {
        return Err(ApiError::Validation("Title is required.".to_string()));
    }

    let status = req
        .status
        .as_deref()
        .and_then(TaskStatus::parse)
        .ok_or_else(|| ApiError::Validation(INVALID_STATUS.to_string()))?;

    let time = parse_time_field(req.time.as_deref())?;

    let task = server
        .store
        .create_task(&CreateTaskParams {
            user_id: principal.user_id.clone(),
            title: title.trim().to_string(),
            details: req.details.clone(),
            status,
            time,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(response::success(CreatedTaskData {
            message: "Successfully created new task.".to_string(),
            task: TaskData::from(task),
        })),
    ))
}

/// Fetch one task owned by the caller.
pub async fn get_task(
    State(server): State<TuskServer>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> Result<Json<Envelope<TaskData>>, ApiError> {
    let principal = server.authenticate(&headers)?;
    let task = lookup_owned_task(&server, &principal, &task_id).await?;
    Ok(Json(response::success(TaskData::from(task))))
}

/// Partially update a task. Absent fields keep their stored value;
/// present-but-invalid fields fail validation. There is no way to clear a
/// field through this route.
pub async fn update_task(
    State(server): State<TuskServer>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Envelope<MessageData>>, ApiError> {
    let principal = server.authenticate(&headers)?;
    let task = lookup_owned_task(&server, &principal, &task_id).await?;

    let mut patch = TaskPatch::default();

    if let Some(title) = req.title.as_deref() {
        if !validate::valid_title(title) {
            return Err(ApiError::Validation("Title is required.".to_string()));
        }
        patch.title = Some(title.trim().to_string());
    }
    if let Some(details) = req.details {
        patch.details = Some(details);
    }
    if req.time.is_some() {
        patch.time = parse_time_field(req.time.as_deref())?;
    }
    if let Some(status) = req.status.as_deref() {
        patch.status = Some(
            TaskStatus::parse(status)
                .ok_or_else(|| ApiError::Validation(INVALID_STATUS.to_string()))?,
        );
    }

    server.store.update_task(&task.id, &patch).await?;

    Ok(Json(response::success_message("Successfully updated a task.")))
}

/// Mark a task complete.
pub async fn complete_task(
    State(server): State<TuskServer>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> Result<Json<Envelope<MessageData>>, ApiError> {
    set_task_status(
        server,
        headers,
        task_id,
        TaskStatus::Complete,
        "Successfully marked task as complete.",
    )
    .await
}

/// Mark a task incomplete.
pub async fn incomplete_task(
    State(server): State<TuskServer>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> Result<Json<Envelope<MessageData>>, ApiError> {
    set_task_status(
        server,
        headers,
        task_id,
        TaskStatus::Incomplete,
        "Successfully marked task as incomplete.",
    )
    .await
}

/// Delete one task owned by the caller.
pub async fn delete_task(
    State(server): State<TuskServer>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> Result<Json<Envelope<MessageData>>, ApiError> {
    let principal = server.authenticate(&headers)?;
    let task = lookup_owned_task(&server, &principal, &task_id).await?;
    server.store.delete_task(&task.id).await?;
    Ok(Json(response::success_message("Successfully deleted a task.")))
}

/// Delete every task owned by the caller.
pub async fn delete_all_tasks(
    State(server): State<TuskServer>,
    headers: HeaderMap,
) -> Result<Json<Envelope<MessageData>>, ApiError> {
    let principal = server.authenticate(&headers)?;
    server
        .store
        .delete_tasks_for_user(&principal.user_id)
        .await?;
    Ok(Json(response::success_message("Successfully deleted all tasks.")))
}

async fn set_task_status(
    server: TuskServer,
    headers: HeaderMap,
    raw_id: String,
    status: TaskStatus,
    message: &'static str,
) -> Result<Json<Envelope<MessageData>>, ApiError> {
    let principal = server.authenticate(&headers)?;
    let task = lookup_owned_task(&server, &principal, &raw_id).await?;

    let patch = TaskPatch {
        status: Some(status),
        ..TaskPatch::default()
    };
    server.store.update_task(&task.id, &patch).await?;

    Ok(Json(response::success_message(message)))
}

/// Resolve a per-task route's target, existence before ownership: a
/// malformed or unknown id is `NotFound`; a record owned by someone else is
/// `Forbidden`.
async fn lookup_owned_task(
    server: &TuskServer,
    principal: &Principal,
    raw_id: &str,
) -> Result<Task, ApiError> {
    let task_id = parse_task_id(raw_id)?;
    let task = server.store.get_task(&task_id).await?;
    authorize(principal, &task.user_id)?;
    Ok(task)
}

/// Path ids that are not well-formed UUIDs name nothing, so they read as
/// `NotFound` rather than a validation failure.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::try_parse(raw)
        .map(TaskId)
        .map_err(|_| ApiError::NotFound)
}

/// A present-but-unparseable time string is a validation failure, never a
/// silently dropped field.
fn parse_time_field(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match raw {
        None => Ok(None),
        Some(raw) => tusk_dates::parse_default(Some(raw))
            .map(Some)
            .ok_or_else(|| ApiError::Validation("Invalid Time".to_string())),
    }
}

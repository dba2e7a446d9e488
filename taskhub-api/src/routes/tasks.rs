//! Task CRUD endpoints.
//!
//! All routes in this module sit behind the bearer-token middleware, so every
//! handler can rely on an [`AuthContext`] extension being present.
//!
//! # Endpoints
//!
//! - `POST /tasks` - Create a task
//! - `GET /tasks` - List tasks, optionally filtered
//! - `GET /tasks/:id` - Fetch a single task
//! - `PUT /tasks/:id` - Partially update a task
//! - `DELETE /tasks/:id` - Delete a task
//! - `PATCH /tasks/:id/status` - Move a task to a new status

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskhub_shared::auth::middleware::AuthContext;
use taskhub_shared::models::task::{CreateTask, Task, TaskFilter, TaskPatch, TaskStatus};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Initial status, defaults to `todo`
    pub status: Option<TaskStatus>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional assignee; must reference an existing user
    pub assigned_to_id: Option<Uuid>,
}

/// Task response
///
/// Nullable fields are serialized as explicit `null` rather than omitted, so
/// clients always see the full shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Free-form description
    pub description: Option<String>,

    /// Current workflow status
    pub status: TaskStatus,

    /// Due date
    pub due_date: Option<DateTime<Utc>>,

    /// Assigned user ID
    pub assigned_to_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            assigned_to_id: task.assigned_to_id,
            created_at: task.created_at,
        }
    }
}

/// Query parameters for the status update endpoint
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Target status
    pub status: TaskStatus,
}

/// Status update response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    /// Confirmation message
    pub message: String,

    /// The status the task now holds
    pub new_status: TaskStatus,
}

/// Delete confirmation response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation message
    pub message: String,
}

/// Create a new task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "title": "Write release notes",
///   "description": "Cover the auth changes",
///   "status": "todo",
///   "due_date": "2025-06-01T12:00:00Z",
///   "assigned_to_id": null
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `assigned_to_id` references no existing user
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate()?;

    tracing::debug!(user_id = %auth.user_id, title = %req.title, "Creating task");

    let task = state
        .tasks
        .create(CreateTask {
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            due_date: req.due_date,
            assigned_to_id: req.assigned_to_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// List tasks, optionally filtered by status and assignee
///
/// # Endpoint
///
/// ```text
/// GET /tasks?status=in_progress&assigned_to_id=<uuid>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.list(&filter).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Fetch a single task by ID
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.tasks.get(id).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Partially update a task
///
/// Only fields present in the request body change. Sending `null` for
/// `description`, `due_date` or `assigned_to_id` clears the field; omitting
/// it leaves the stored value alone.
///
/// # Endpoint
///
/// ```text
/// PUT /tasks/:id
/// Content-Type: application/json
///
/// {
///   "title": "Write release notes (v2)",
///   "due_date": null
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `assigned_to_id` references no existing user
/// - `404 Not Found`: No task with this ID
/// - `422 Unprocessable Entity`: Blank title
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.tasks.update(id, patch).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    tracing::debug!(user_id = %auth.user_id, task_id = %id, "Deleting task");

    state.tasks.delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Move a task to a new status
///
/// Any of the three statuses can be set at any time; the workflow allows
/// every transition, including back to `todo`.
///
/// # Endpoint
///
/// ```text
/// PATCH /tasks/:id/status?status=done
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
pub async fn set_task_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<StatusUpdateResponse>> {
    let task = state.tasks.set_status(id, query.status).await?;

    Ok(Json(StatusUpdateResponse {
        message: format!("Task status updated to {}", task.status),
        new_status: task.status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            title: "Write release notes".to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            assigned_to_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_task_response_keeps_nulls_visible() {
        let response = TaskResponse::from(sample_task());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "todo");
        assert!(json["description"].is_null());
        assert!(json["due_date"].is_null());
        assert!(json["assigned_to_id"].is_null());
    }

    #[test]
    fn test_create_task_request_rejects_empty_title() {
        let req = CreateTaskRequest {
            title: String::new(),
            description: None,
            status: None,
            due_date: None,
            assigned_to_id: None,
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_create_task_request_rejects_oversized_title() {
        let req = CreateTaskRequest {
            title: "x".repeat(256),
            description: None,
            status: None,
            due_date: None,
            assigned_to_id: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_task_request_accepts_minimal_input() {
        let req = CreateTaskRequest {
            title: "Write release notes".to_string(),
            description: None,
            status: None,
            due_date: None,
            assigned_to_id: None,
        };

        assert!(req.validate().is_ok());
        assert_eq!(req.status.unwrap_or_default(), TaskStatus::Todo);
    }

    #[test]
    fn test_status_update_response_message() {
        let body = StatusUpdateResponse {
            message: format!("Task status updated to {}", TaskStatus::InProgress),
            new_status: TaskStatus::InProgress,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Task status updated to in_progress");
        assert_eq!(json["new_status"], "in_progress");
    }
}

//! Task model and database operations.
//!
//! Tasks move through a three-state workflow (`todo`, `in_progress`, `done`)
//! with every transition permitted, including re-opening a finished task and
//! setting the state a task is already in. Updates go through [`TaskPatch`],
//! which distinguishes a field that was omitted (leave it alone) from one
//! explicitly set to `null` (clear it).
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
//!
//! CREATE TABLE tasks (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     title TEXT NOT NULL,
//!     description TEXT,
//!     status task_status NOT NULL DEFAULT 'todo',
//!     due_date TIMESTAMPTZ,
//!     assigned_to_id UUID REFERENCES users(id),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task workflow status.
///
/// Serializes as `todo` / `in_progress` / `done` both on the wire and in the
/// `task_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Gets the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Short summary, never empty
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current workflow status
    pub status: TaskStatus,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,

    /// Optional assignee; references a registered user when set
    pub assigned_to_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Short summary (must be non-empty; enforced by `TaskService`)
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Initial status
    pub status: TaskStatus,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,

    /// Optional assignee
    pub assigned_to_id: Option<Uuid>,
}

/// Partial update for a task.
///
/// Every field is optional; only present fields are written. For the
/// nullable columns the two `Option` layers mean:
///
/// - `None` - field was omitted, leave the stored value alone
/// - `Some(None)` - field was explicitly `null`, clear it
/// - `Some(Some(v))` - set the field to `v`
///
/// `title` and `status` cannot be cleared, so for those a JSON `null` is
/// treated the same as omission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,

    /// New description (JSON `null` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New deadline (JSON `null` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New assignee (JSON `null` unassigns)
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to_id: Option<Option<Uuid>>,
}

/// Deserializes a field so that an explicit `null` becomes `Some(None)`
/// while an absent field stays `None` (via `#[serde(default)]`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TaskPatch {
    /// True when the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.assigned_to_id.is_none()
    }
}

/// Filters for listing tasks; conditions combine conjunctively.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TaskFilter {
    /// Only tasks in this status
    pub status: Option<TaskStatus>,

    /// Only tasks assigned to this user
    pub assigned_to_id: Option<Uuid>,
}

impl Task {
    /// Inserts a new task and returns the stored row.
    ///
    /// A dangling `assigned_to_id` trips the foreign key and surfaces as a
    /// `sqlx::Error` for the caller to classify.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, due_date, assigned_to_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, due_date, assigned_to_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.due_date)
        .bind(data.assigned_to_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, assigned_to_id, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks matching the filter.
    ///
    /// Results come back in insertion order (`created_at ASC`, with `id` as
    /// the tiebreak for rows created in the same instant).
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Self>, sqlx::Error> {
        // Build the WHERE clause from whichever filters are present
        let mut query = String::from(
            "SELECT id, title, description, status, due_date, assigned_to_id, created_at \
             FROM tasks",
        );
        let mut bind_count = 0;

        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" WHERE status = ${}", bind_count));
        }
        if filter.assigned_to_id.is_some() {
            bind_count += 1;
            query.push_str(if bind_count == 1 { " WHERE" } else { " AND" });
            query.push_str(&format!(" assigned_to_id = ${}", bind_count));
        }

        query.push_str(" ORDER BY created_at ASC, id ASC");

        let mut q = sqlx::query_as::<_, Task>(&query);
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(assignee) = filter.assigned_to_id {
            q = q.bind(assignee);
        }

        q.fetch_all(pool).await
    }

    /// Applies a partial update and returns the updated row.
    ///
    /// Builds the `SET` list dynamically from the fields present in the
    /// patch. Returns `None` if the task doesn't exist; an empty patch is a
    /// no-op that still reports whether the task exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: TaskPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1; // $1 is the task id

        if data.title.is_some() {
            bind_count += 1;
            sets.push(format!("title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            sets.push(format!("description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            sets.push(format!("status = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            sets.push(format!("due_date = ${}", bind_count));
        }
        if data.assigned_to_id.is_some() {
            bind_count += 1;
            sets.push(format!("assigned_to_id = ${}", bind_count));
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 \
             RETURNING id, title, description, status, due_date, assigned_to_id, created_at",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(assignee) = data.assigned_to_id {
            q = q.bind(assignee);
        }

        q.fetch_optional(pool).await
    }

    /// Moves a task to `status`, regardless of its current status.
    ///
    /// Returns `None` if the task doesn't exist.
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2
            WHERE id = $1
            RETURNING id, title, description, status, due_date, assigned_to_id, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task by ID.
    ///
    /// Returns true if a row was deleted, false if the task didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

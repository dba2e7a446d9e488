//! Task operations with domain-level error reporting.
//!
//! `TaskService` wraps the [`Task`](crate::models::task::Task) store and
//! turns row-level outcomes into domain errors: a missing row becomes
//! [`TaskError::NotFound`], a tripped foreign key on the assignee becomes
//! [`TaskError::AssigneeNotFound`], and a blank title is rejected before it
//! reaches the database. Referential integrity itself lives in the schema,
//! so checking and inserting never race.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::{CreateTask, Task, TaskFilter, TaskPatch, TaskStatus};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// No task with the requested ID
    #[error("Task not found")]
    NotFound,

    /// Title missing or blank
    #[error("Title must not be empty")]
    EmptyTitle,

    /// `assigned_to_id` does not reference a registered user
    #[error("Assigned user does not exist")]
    AssigneeNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// True when the error is the assignee foreign key being violated.
fn is_assignee_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_foreign_key_violation()
                && db_err.constraint().is_some_and(|c| c.contains("assigned_to"))
        }
        _ => false,
    }
}

/// Task CRUD and status workflow over a shared connection pool.
#[derive(Clone)]
pub struct TaskService {
    db: PgPool,
}

impl TaskService {
    /// Creates a new task service over the given pool.
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// - `TaskError::EmptyTitle` if the title is empty or whitespace
    /// - `TaskError::AssigneeNotFound` if `assigned_to_id` is set but no such
    ///   user exists
    pub async fn create(&self, data: CreateTask) -> Result<Task, TaskError> {
        if data.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        let task = Task::create(&self.db, data).await.map_err(|e| {
            if is_assignee_violation(&e) {
                TaskError::AssigneeNotFound
            } else {
                TaskError::Database(e)
            }
        })?;

        tracing::info!(task_id = %task.id, status = %task.status, "Task created");
        Ok(task)
    }

    /// Lists tasks matching the filter, in insertion order.
    pub async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskError> {
        Ok(Task::list(&self.db, filter).await?)
    }

    /// Fetches a single task.
    pub async fn get(&self, id: Uuid) -> Result<Task, TaskError> {
        Task::find_by_id(&self.db, id)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Applies a partial update.
    ///
    /// Only fields present in the patch are written; see
    /// [`TaskPatch`](crate::models::task::TaskPatch) for the absent-vs-null
    /// rules. An empty patch is a no-op that still 404s on a missing task.
    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, TaskError> {
        if let Some(ref title) = patch.title {
            if title.trim().is_empty() {
                return Err(TaskError::EmptyTitle);
            }
        }

        let updated = Task::update(&self.db, id, patch).await.map_err(|e| {
            if is_assignee_violation(&e) {
                TaskError::AssigneeNotFound
            } else {
                TaskError::Database(e)
            }
        })?;

        let task = updated.ok_or(TaskError::NotFound)?;
        tracing::info!(task_id = %task.id, "Task updated");
        Ok(task)
    }

    /// Moves a task to `status`.
    ///
    /// Every transition between the three states is legal, including setting
    /// the status a task already has.
    pub async fn set_status(&self, id: Uuid, status: TaskStatus) -> Result<Task, TaskError> {
        let task = Task::set_status(&self.db, id, status)
            .await?
            .ok_or(TaskError::NotFound)?;

        tracing::info!(task_id = %task.id, status = %task.status, "Task status changed");
        Ok(task)
    }

    /// Deletes a task.
    pub async fn delete(&self, id: Uuid) -> Result<(), TaskError> {
        let deleted = Task::delete(&self.db, id).await?;
        if !deleted {
            return Err(TaskError::NotFound);
        }

        tracing::info!(task_id = %id, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(TaskError::NotFound.to_string(), "Task not found");
        assert_eq!(TaskError::EmptyTitle.to_string(), "Title must not be empty");
        assert_eq!(
            TaskError::AssigneeNotFound.to_string(),
            "Assigned user does not exist"
        );
    }

    // Store-backed behavior is covered in tests/task_service_tests.rs
}

/// Task model and database operations
///
/// Tasks are the owned unit of work in TaskFlow. Every read, update, and
/// delete is filtered by the owning user inside the SQL statement itself,
/// so a task owned by someone else is indistinguishable from a task that
/// does not exist.
///
/// Update and delete are single atomic conditional writes
/// (`... WHERE id = $1 AND user_id = $2`), not read-then-write sequences,
/// which eliminates the TOCTOU gap for those operations.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(140) NOT NULL,
///     description VARCHAR(1000),
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::models::task::{Task, NewTask, TaskPriority, TaskStatus};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, owner, NewTask {
///     title: "Buy milk".to_string(),
///     description: None,
///     status: TaskStatus::Pending,
///     priority: TaskPriority::Medium,
///     due_date: None,
/// }).await?;
///
/// let found = Task::find_by_id(&pool, owner, task.id).await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use super::query::{BindValue, TaskQuery};

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is open
    Pending,

    /// Task is done
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(()),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl TaskPriority {
    /// Converts priority to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(()),
        }
    }
}

/// Task model representing an owned unit of work
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user, immutable after creation
    #[serde(rename = "userId")]
    pub user_id: Uuid,

    /// Title (non-empty, at most 140 characters, whitespace-trimmed)
    pub title: String,

    /// Optional description (at most 1000 characters)
    pub description: Option<String>,

    /// Completion status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    #[serde(rename = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// When the task was last modified
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// The owner is passed separately and bound from the authenticated
/// identity, never from the request body.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Title (already validated and trimmed by the endpoint layer)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Status (defaults to pending)
    pub status: TaskStatus,

    /// Priority (defaults to medium)
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Allow-listed partial update
///
/// `None` fields are left unchanged. `description` and `due_date` use a
/// nested `Option` to distinguish "absent, leave unchanged" (`None`) from
/// "explicit null, clear the field" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New title
    pub title: Option<String>,

    /// New description (Some(None) clears it)
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date (Some(None) clears it)
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskUpdate {
    /// Returns true when no allow-listed field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

impl Task {
    /// Creates a new task owned by `owner`
    pub async fn create(pool: &PgPool, owner: Uuid, data: NewTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, status, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, status, priority, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks for `owner`, filtered and sorted per `query`
    ///
    /// Returns the full matching set; there is no pagination in the current
    /// scope.
    pub async fn list(
        pool: &PgPool,
        owner: Uuid,
        query: &TaskQuery,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let (sql, binds) = query.build_sql();

        let mut q = sqlx::query_as::<_, Task>(&sql).bind(owner);
        for bind in binds {
            q = match bind {
                BindValue::Status(status) => q.bind(status),
                BindValue::Priority(priority) => q.bind(priority),
                BindValue::Timestamp(ts) => q.bind(ts),
                BindValue::Text(text) => q.bind(text),
            };
        }

        q.fetch_all(pool).await
    }

    /// Finds a task by id, scoped to `owner`
    ///
    /// Returns `None` both when the task does not exist and when it is
    /// owned by a different user.
    pub async fn find_by_id(
        pool: &PgPool,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, priority, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies an allow-listed partial update as a single conditional write
    ///
    /// Only set fields are touched; `updated_at` is always bumped. The
    /// ownership check and the write are one statement, so there is no
    /// window between them.
    ///
    /// Returns `None` under the same ownership rule as [`Task::find_by_id`].
    pub async fn update(
        pool: &PgPool,
        owner: Uuid,
        id: Uuid,
        data: TaskUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET clause dynamically based on which fields are present
        let mut sql = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut placeholder = 2;

        if data.title.is_some() {
            placeholder += 1;
            sql.push_str(&format!(", title = ${}", placeholder));
        }
        if data.description.is_some() {
            placeholder += 1;
            sql.push_str(&format!(", description = ${}", placeholder));
        }
        if data.status.is_some() {
            placeholder += 1;
            sql.push_str(&format!(", status = ${}", placeholder));
        }
        if data.priority.is_some() {
            placeholder += 1;
            sql.push_str(&format!(", priority = ${}", placeholder));
        }
        if data.due_date.is_some() {
            placeholder += 1;
            sql.push_str(&format!(", due_date = ${}", placeholder));
        }

        sql.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, status, priority, due_date, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&sql).bind(id).bind(owner);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            // Some(None) binds SQL NULL, clearing the description
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            // Some(None) binds SQL NULL, clearing the due date
            q = q.bind(due_date);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a task by id, scoped to `owner`
    ///
    /// Returns `true` if a row was deleted, `false` if the task was absent
    /// or not owned.
    pub async fn delete(pool: &PgPool, owner: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

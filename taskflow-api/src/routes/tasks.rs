/// Task CRUD endpoints
///
/// Every handler receives the authenticated identity from the
/// authorization gate and passes it down as the owner; the repository
/// scopes every statement to it, so a task belonging to another user is
/// reported as 404, never 403: the endpoint does not confirm that the
/// task exists at all.
///
/// # Endpoints
///
/// - `GET /tasks` - List with filtering/sorting
/// - `POST /tasks` - Create
/// - `GET /tasks/:id` - Fetch one
/// - `PUT /tasks/:id` - Allow-list partial update
/// - `DELETE /tasks/:id` - Delete
///
/// # Field validation
///
/// Title is required, whitespace-trimmed, non-empty, at most 140
/// characters; description at most 1000. Due dates accept RFC 3339 or
/// `YYYY-MM-DD`; anything else is rejected with 400 on create/update
/// (list filters stay lenient, see the query builder). Unknown body
/// fields on update are silently dropped, not rejected.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use taskflow_shared::models::{
    query::{parse_datetime_lenient, TaskQuery, TaskQueryParams},
    task::{NewTask, Task, TaskPriority, TaskStatus, TaskUpdate},
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
};

/// Maximum title length in characters
const TITLE_MAX_LEN: usize = 140;

/// Maximum description length in characters
const DESCRIPTION_MAX_LEN: usize = 1000;

/// Create request body
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

/// Update request body
///
/// `description` and `due_date` distinguish an absent key (leave
/// unchanged) from an explicit `null` (clear the field) via the nested
/// `Option`. Fields outside the allow-list are ignored by deserialization.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(
        default,
        rename = "dueDate",
        deserialize_with = "deserialize_explicit_null"
    )]
    pub due_date: Option<Option<String>>,
}

/// Single-task response
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// Acknowledgement response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List tasks
///
/// # Endpoint
///
/// ```text
/// GET /tasks?status=pending&priority=high&dueFrom=2025-01-01&sortBy=dueDate&sortOrder=asc&q=milk
/// Authorization: Bearer <token>
/// ```
///
/// Returns the full matching set; pagination is a deliberate non-goal of
/// the current scope.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<TaskQueryParams>,
) -> ApiResult<Json<TaskListResponse>> {
    let query = TaskQuery::from_params(&params)?;
    let tasks = Task::list(&state.db, current.id, &query).await?;

    Ok(Json(TaskListResponse { tasks }))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "title": "Buy milk", "priority": "high", "dueDate": "2025-06-01" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: title missing/empty/too long, bad enum value, or
///   unparseable due date
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let title = validate_title(req.title.as_deref())?;
    let description = validate_description(req.description.as_deref())?;
    let status = parse_status(req.status.as_deref())?.unwrap_or_default();
    let priority = parse_priority(req.priority.as_deref())?.unwrap_or_default();
    let due_date = parse_due_date(req.due_date.as_deref())?;

    let task = Task::create(
        &state.db,
        current.id,
        NewTask {
            title,
            description,
            status,
            priority,
            due_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

/// Fetch a task by id
///
/// # Errors
///
/// - `404 Not Found`: no task with that id exists for this owner
///   (including tasks owned by someone else)
pub async fn get_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::find_by_id(&state.db, current.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse { task }))
}

/// Apply an allow-list partial update
///
/// Submitted fields in {title, description, status, priority, dueDate}
/// are applied; everything else in the body is dropped. A body with no
/// allow-listed field is a no-op that still returns the task. An explicit
/// `null` (or empty string) description clears the column, the same way an
/// explicit `null` dueDate does. The update and ownership check are one
/// atomic conditional write.
///
/// # Errors
///
/// - `400 Bad Request`: a supplied field fails validation
/// - `404 Not Found`: absent or not-owned task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let update = TaskUpdate {
        title: match req.title.as_deref() {
            Some(raw) => Some(validate_title(Some(raw))?),
            None => None,
        },
        description: match req.description {
            // A validated-to-empty value clears the column, like explicit null
            Some(Some(ref raw)) => Some(validate_description(Some(raw.as_str()))?),
            Some(None) => Some(None),
            None => None,
        },
        status: parse_status(req.status.as_deref())?,
        priority: parse_priority(req.priority.as_deref())?,
        due_date: match req.due_date {
            Some(Some(ref raw)) => Some(Some(require_due_date(raw)?)),
            Some(None) => Some(None),
            None => None,
        },
    };

    let task = Task::update(&state.db, current.id, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse { task }))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: absent or not-owned task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete(&state.db, current.id, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}

/// Validates and trims a title
fn validate_title(raw: Option<&str>) -> Result<String, ApiError> {
    let title = raw.unwrap_or("").trim();

    if title.is_empty() {
        return Err(ApiError::Validation("Task title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ApiError::Validation(format!(
            "Title must be at most {} characters",
            TITLE_MAX_LEN
        )));
    }

    Ok(title.to_string())
}

/// Validates and trims a description; empty strings become None
fn validate_description(raw: Option<&str>) -> Result<Option<String>, ApiError> {
    let Some(description) = raw.map(str::trim) else {
        return Ok(None);
    };

    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ApiError::Validation(format!(
            "Description must be at most {} characters",
            DESCRIPTION_MAX_LEN
        )));
    }

    if description.is_empty() {
        Ok(None)
    } else {
        Ok(Some(description.to_string()))
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, ApiError> {
    match raw {
        Some(value) => value
            .parse::<TaskStatus>()
            .map(Some)
            .map_err(|_| ApiError::Validation(format!("Invalid status: {}", value))),
        None => Ok(None),
    }
}

fn parse_priority(raw: Option<&str>) -> Result<Option<TaskPriority>, ApiError> {
    match raw {
        Some(value) => value
            .parse::<TaskPriority>()
            .map(Some)
            .map_err(|_| ApiError::Validation(format!("Invalid priority: {}", value))),
        None => Ok(None),
    }
}

/// Parses an optional due date, rejecting unparseable values
///
/// Create and update reject bad dates outright; only the list filters stay
/// lenient.
fn parse_due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match raw {
        Some(value) => require_due_date(value).map(Some),
        None => Ok(None),
    }
}

fn require_due_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    parse_datetime_lenient(raw)
        .ok_or_else(|| ApiError::Validation(format!("Invalid due date: {}", raw)))
}

/// Maps JSON `null` to `Some(None)` so it is distinguishable from an
/// absent key (which stays `None` via `#[serde(default)]`)
fn deserialize_explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<String>::deserialize(deserializer)?))
}

/// Owner-scoped task list query construction
///
/// Translates the flat, optional request parameters of `GET /tasks` into a
/// validated SQL query. The query is always AND-constrained to the owning
/// user, so cross-user reads are structurally impossible rather than merely
/// permission-checked.
///
/// # Parameter policies
///
/// - `status` / `priority`: equality filters; values outside the
///   enumerations are a validation failure (`QueryError`)
/// - `dueFrom` / `dueTo`: inclusive range on due date; unparseable values
///   are silently ignored, not an error
/// - `q`: case-insensitive substring match on title; `ILIKE`
///   metacharacters in the needle are escaped so matching is always literal
/// - `sortBy`: allow-list of `dueDate` and `createdAt`; anything else
///   falls back to `createdAt`. `sortOrder` is `asc` or `desc`
///   (default `desc`)
/// - Ordering always carries an id-descending tie-break so equal primary
///   sort keys produce a deterministic order
///
/// Construction is pure: [`TaskQuery::build_sql`] produces the SQL text and
/// bind values without touching a pool, so the policies above are unit
/// testable without a live database.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::task::{TaskPriority, TaskStatus};

/// Error type for query parameter validation
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Status value outside the enumeration
    #[error("Invalid status filter: {0}")]
    InvalidStatus(String),

    /// Priority value outside the enumeration
    #[error("Invalid priority filter: {0}")]
    InvalidPriority(String),
}

/// Raw query parameters as they arrive on the wire
///
/// Everything is optional and untyped; [`TaskQuery::from_params`] applies
/// the validation and fallback policies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQueryParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(rename = "dueFrom")]
    pub due_from: Option<String>,
    #[serde(rename = "dueTo")]
    pub due_to: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    pub q: Option<String>,
}

/// Sort field allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    DueDate,
    CreatedAt,
}

impl SortField {
    /// Column name for the ORDER BY clause
    fn column(&self) -> &'static str {
        match self {
            SortField::DueDate => "due_date",
            SortField::CreatedAt => "created_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Value bound into the generated SQL, in placeholder order
///
/// The owner id is always `$1` and bound by the caller; these cover `$2`
/// onward.
#[derive(Debug, Clone)]
pub enum BindValue {
    Status(TaskStatus),
    Priority(TaskPriority),
    Timestamp(DateTime<Utc>),
    Text(String),
}

/// Validated task list query
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_from: Option<DateTime<Utc>>,
    pub due_to: Option<DateTime<Utc>>,
    pub q: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl TaskQuery {
    /// Validates raw request parameters into a query
    ///
    /// # Errors
    ///
    /// Returns `QueryError` when `status` or `priority` is present but
    /// outside its enumeration. Unparseable date bounds are dropped
    /// silently; unknown sort fields fall back to `createdAt`.
    pub fn from_params(params: &TaskQueryParams) -> Result<Self, QueryError> {
        let status = match params.status.as_deref() {
            Some(raw) => Some(
                raw.parse::<TaskStatus>()
                    .map_err(|_| QueryError::InvalidStatus(raw.to_string()))?,
            ),
            None => None,
        };

        let priority = match params.priority.as_deref() {
            Some(raw) => Some(
                raw.parse::<TaskPriority>()
                    .map_err(|_| QueryError::InvalidPriority(raw.to_string()))?,
            ),
            None => None,
        };

        // Lenient by design: a bad date bound is ignored, not rejected
        let due_from = params.due_from.as_deref().and_then(parse_datetime_lenient);
        let due_to = params.due_to.as_deref().and_then(parse_datetime_lenient);

        let sort_by = match params.sort_by.as_deref() {
            Some("dueDate") => SortField::DueDate,
            _ => SortField::CreatedAt,
        };

        let sort_order = match params.sort_order.as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        Ok(Self {
            status,
            priority,
            due_from,
            due_to,
            q: params.q.clone().filter(|s| !s.is_empty()),
            sort_by,
            sort_order,
        })
    }

    /// Builds the SELECT statement and its bind values
    ///
    /// `$1` is reserved for the owner id; returned binds start at `$2`.
    /// Due-date sorts order NULLs last regardless of direction.
    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut sql = String::from(
            "SELECT id, user_id, title, description, status, priority, due_date, \
             created_at, updated_at FROM tasks WHERE user_id = $1",
        );
        let mut binds: Vec<BindValue> = Vec::new();
        let mut placeholder = 1;

        if let Some(status) = self.status {
            placeholder += 1;
            sql.push_str(&format!(" AND status = ${}", placeholder));
            binds.push(BindValue::Status(status));
        }

        if let Some(priority) = self.priority {
            placeholder += 1;
            sql.push_str(&format!(" AND priority = ${}", placeholder));
            binds.push(BindValue::Priority(priority));
        }

        if let Some(due_from) = self.due_from {
            placeholder += 1;
            sql.push_str(&format!(" AND due_date >= ${}", placeholder));
            binds.push(BindValue::Timestamp(due_from));
        }

        if let Some(due_to) = self.due_to {
            placeholder += 1;
            sql.push_str(&format!(" AND due_date <= ${}", placeholder));
            binds.push(BindValue::Timestamp(due_to));
        }

        if let Some(ref needle) = self.q {
            placeholder += 1;
            sql.push_str(&format!(" AND title ILIKE ${}", placeholder));
            binds.push(BindValue::Text(format!("%{}%", escape_like(needle))));
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(self.sort_by.column());
        sql.push(' ');
        sql.push_str(self.sort_order.keyword());
        if self.sort_by == SortField::DueDate {
            sql.push_str(" NULLS LAST");
        }
        // Deterministic ordering when primary sort keys are equal
        sql.push_str(", id DESC");

        (sql, binds)
    }
}

/// Parses a date string leniently
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (interpreted as
/// midnight UTC). Returns `None` for anything else.
pub fn parse_datetime_lenient(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }

    None
}

/// Escapes `ILIKE` metacharacters so the needle matches literally
///
/// Without this, a search for `100%` would match every title.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

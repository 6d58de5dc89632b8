/// Error handling for the API server
///
/// A single unified error type maps every business failure to an HTTP
/// status and a JSON `{message}` body. Handlers return
/// `Result<T, ApiError>`; the conversion to a response happens at this one
/// boundary.
///
/// # Taxonomy
///
/// - `Validation` → 400 (malformed or missing input)
/// - `Unauthorized` → 401 (missing, malformed, expired, or stale token,
///   or bad credentials)
/// - `NotFound` → 404 (missing or not-owned resource)
/// - `Conflict` → 409 (duplicate unique key)
/// - `Internal` → 500 (unexpected persistence or runtime failure; detail
///   is logged, never sent to the client)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use taskflow_shared::auth::{jwt::JwtError, password::PasswordError};
use taskflow_shared::models::query::QueryError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Authentication failure (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Missing or not-owned resource (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate unique key (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected failure (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique constraint violations surface as conflicts: the second of two
/// racing registrations must see a 409, not a 500.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    if db_err.constraint().is_some_and(|c| c.contains("email")) {
                        return ApiError::Conflict(
                            "User with this email already exists".to_string(),
                        );
                    }
                    return ApiError::Conflict("Duplicate value".to_string());
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert token errors to API errors
///
/// Malformed, bad-signature, and expired tokens all collapse into one 401.
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::Internal(msg),
            JwtError::Expired | JwtError::Invalid(_) => {
                ApiError::Unauthorized("Not authorized, invalid token".to_string())
            }
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert query parameter errors to API errors
impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

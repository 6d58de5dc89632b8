/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user, returns user + token
/// - `POST /auth/login` - Login with email/password, returns user + token
/// - `GET /auth/me` - Current user (requires bearer token)
///
/// Registration pre-checks the email for a friendly conflict message, but
/// the schema's unique constraint is what actually closes the race: two
/// concurrent registrations can both pass the pre-check, and the losing
/// insert is mapped to a 409 by the error boundary, never a 500.
///
/// Login failures are deliberately indistinguishable: an unknown email and
/// a wrong password produce the same status and message, so the endpoint
/// cannot be used to enumerate accounts.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, PublicUser, User},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
};

/// Register request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// Plaintext password (hashed before storage, never persisted)
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: Option<String>,

    /// Password
    pub password: Option<String>,
}

/// Register/login response: public user projection plus bearer token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Public user projection (never includes the password hash)
    pub user: PublicUser,

    /// Signed bearer token
    pub token: String,
}

/// Current-user response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "name": "John Doe",
///   "email": "user@example.com",
///   "password": "hunter22!"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: name, email, or password missing
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (name, email, plaintext) = match (req.name, req.email, req.password) {
        (Some(name), Some(email), Some(pw))
            if !name.is_empty() && !email.is_empty() && !pw.is_empty() =>
        {
            (name, email, pw)
        }
        _ => {
            return Err(ApiError::Validation(
                "Please provide name, email, and password".to_string(),
            ))
        }
    };

    // Friendly pre-check; the unique constraint is the real enforcer
    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&plaintext)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name,
            email,
            password_hash,
        },
    )
    .await?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: PublicUser::from(user),
            token,
        }),
    ))
}

/// Login
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "hunter22!"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: email or password missing
/// - `401 Unauthorized`: bad credentials (same message for unknown email
///   and wrong password)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (email, plaintext) = match (req.email, req.password) {
        (Some(email), Some(pw)) if !email.is_empty() && !pw.is_empty() => (email, pw),
        _ => {
            return Err(ApiError::Validation(
                "Please provide email and password".to_string(),
            ))
        }
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&plaintext, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = issue_token(&state, &user)?;

    Ok(Json(AuthResponse {
        user: PublicUser::from(user),
        token,
    }))
}

/// Current user
///
/// Returns the identity the authorization gate already resolved; no extra
/// store lookup happens here.
///
/// # Endpoint
///
/// ```text
/// GET /auth/me
/// Authorization: Bearer <token>
/// ```
pub async fn me(Extension(current): Extension<CurrentUser>) -> ApiResult<Json<UserResponse>> {
    Ok(Json(UserResponse {
        user: PublicUser {
            id: current.id,
            name: current.name,
            email: current.email,
            created_at: current.created_at,
        },
    }))
}

fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    let claims = jwt::Claims::new(user.id, Duration::hours(state.config.jwt.ttl_hours));
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

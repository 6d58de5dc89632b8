/// Authorization gate
///
/// Middleware applied to every protected route. It extracts the bearer
/// token from the `Authorization` header, validates the signature and
/// expiry, then resolves the embedded user id against the credential
/// store. All three failure modes (no token, invalid token, token whose
/// user no longer exists) produce a 401 before business logic runs.
///
/// The store lookup is deliberate even though the token is self-contained:
/// a token can be cryptographically valid yet reference a deleted user.
/// Exactly one lookup happens per request; the resolved identity is never
/// cached across requests.
///
/// On success the handler finds a [`CurrentUser`] in the request
/// extensions and can respond without a second lookup.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use taskflow_shared::{auth::jwt, models::user::User};

use crate::{app::AppState, error::ApiError};

/// Authenticated identity attached to the request
///
/// A public projection: no password hash ever rides along the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Bearer token authentication middleware
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - The Authorization header is missing or not a Bearer token
/// - Token validation fails (bad signature, malformed, expired)
/// - The token's user no longer exists (stale token)
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, token missing".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, token missing".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    // The token may outlive its user; a valid signature is not enough
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, user not found".to_string()))?;

    req.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(req).await)
}

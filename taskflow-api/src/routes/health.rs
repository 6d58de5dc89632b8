/// Health check endpoint
///
/// Verifies the server is running and probes database connectivity.
/// Reports degraded rather than failing when the probe errors, so load
/// balancers can distinguish "process up, store down" from "process down".
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "db": "connected",
///   "version": "0.1.0"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Database status
    pub db: String,

    /// Application version
    pub version: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let db_status = match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Ok(Json(HealthResponse {
        status: if db_status == "connected" {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        db: db_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

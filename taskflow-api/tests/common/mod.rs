/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - Test database setup (migrations against `DATABASE_URL`)
/// - Router construction with test configuration
/// - Request helpers driving the router as a tower `Service`
/// - User registration shortcuts

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskflow_api::app::{build_router, AppState};
use taskflow_api::config::Config;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request through the router, returning status and JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Registers a fresh user, returning (token, user_id, email)
    pub async fn register_user(&self, name: &str) -> (String, Uuid, String) {
        let email = format!("{}-{}@example.com", name, Uuid::new_v4());

        let (status, body) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "correct horse battery staple",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let token = body["token"].as_str().unwrap().to_string();
        let user_id = body["user"]["id"].as_str().unwrap().parse().unwrap();

        (token, user_id, email)
    }

    /// Creates a task for the given token, returning its id
    pub async fn create_task(&self, token: &str, body: Value) -> Uuid {
        let (status, body) = self
            .request("POST", "/tasks", Some(token), Some(body))
            .await;

        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["task"]["id"].as_str().unwrap().parse().unwrap()
    }
}

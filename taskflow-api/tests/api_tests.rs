/// Integration tests for the TaskFlow API
///
/// These tests run the full request pipeline end-to-end against a live
/// PostgreSQL database (configured via `DATABASE_URL`):
/// - Registration, login, and token verification
/// - Ownership scoping (cross-user access is 404, never 403)
/// - Filtering, sorting, and search
/// - Allow-list partial updates
/// - Stale-token rejection

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use taskflow_shared::auth::jwt;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "connected");
}

#[tokio::test]
async fn test_register_token_resolves_to_user() {
    let ctx = TestContext::new().await.unwrap();

    let (token, user_id, email) = ctx.register_user("alice").await;

    // The returned token, when verified, resolves to the created user
    let claims = jwt::validate_token(&token, &ctx.config.jwt.secret).unwrap();
    assert_eq!(claims.sub, user_id);

    // And /auth/me agrees
    let (status, body) = ctx.request("GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], email);
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_missing_fields() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({"email": "x@example.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new().await.unwrap();

    let (_, _, email) = ctx.register_user("bob").await;

    let (status, _) = ctx
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "imposter",
                "email": email,
                "password": "something else",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);

    // Exactly one user record persists for that email
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_login_enumeration_resistance() {
    let ctx = TestContext::new().await.unwrap();

    let (_, _, email) = ctx.register_user("carol").await;

    // Correct email, wrong password
    let (status_wrong_pw, body_wrong_pw) = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": email, "password": "wrong"})),
        )
        .await;

    // Non-existent email
    let (status_no_user, body_no_user) = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "wrong"})),
        )
        .await;

    assert_eq!(status_wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(status_no_user, StatusCode::UNAUTHORIZED);

    // Same kind and same message text both ways
    assert_eq!(body_wrong_pw["message"], body_no_user["message"]);
}

#[tokio::test]
async fn test_login_success() {
    let ctx = TestContext::new().await.unwrap();

    let (_, user_id, email) = ctx.register_user("dave").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": email, "password": "correct horse battery staple"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id.to_string());
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_missing_and_malformed_tokens_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request("GET", "/tasks", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stale_token_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (token, user_id, _) = ctx.register_user("ghost").await;

    // Delete the user behind the token's back
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&ctx.db)
        .await
        .unwrap();

    // Cryptographically valid, but the subject no longer exists
    let (status, _) = ctx.request("GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_task_defaults() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("eve").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({"title": "Buy milk"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["task"]["title"], "Buy milk");
    assert_eq!(body["task"]["status"], "pending");
    assert_eq!(body["task"]["priority"], "medium");
    assert!(body["task"]["dueDate"].is_null());
}

#[tokio::test]
async fn test_create_task_title_validation() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("frank").await;

    let (status, _) = ctx
        .request("POST", "/tasks", Some(&token), Some(json!({"title": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .request("POST", "/tasks", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .request(
            "POST",
            "/tasks",
            Some(&token),
            Some(json!({"title": "x".repeat(141)})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cross_user_access_is_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let (token_a, _, _) = ctx.register_user("owner").await;
    let (token_b, _, _) = ctx.register_user("intruder").await;

    let task_id = ctx
        .create_task(&token_a, json!({"title": "private task"}))
        .await;

    // Get, update, and delete by a non-owner all report 404, never 403
    let uri = format!("/tasks/{}", task_id);

    let (status, _) = ctx.request("GET", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request("PUT", &uri, Some(&token_b), Some(json!({"title": "stolen"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.request("DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The task is untouched for its owner
    let (status, body) = ctx.request("GET", &uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["title"], "private task");
}

#[tokio::test]
async fn test_partial_update_touches_only_submitted_fields() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("grace").await;

    let task_id = ctx
        .create_task(
            &token,
            json!({
                "title": "Write report",
                "description": "quarterly numbers",
                "priority": "high",
                "dueDate": "2025-09-01",
            }),
        )
        .await;

    let uri = format!("/tasks/{}", task_id);

    let (status, body) = ctx
        .request("PUT", &uri, Some(&token), Some(json!({"status": "completed"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["status"], "completed");
    assert_eq!(body["task"]["title"], "Write report");
    assert_eq!(body["task"]["description"], "quarterly numbers");
    assert_eq!(body["task"]["priority"], "high");
    assert!(!body["task"]["dueDate"].is_null());
}

#[tokio::test]
async fn test_update_with_unknown_fields_is_a_noop() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("heidi").await;

    let task_id = ctx.create_task(&token, json!({"title": "unchanged"})).await;
    let uri = format!("/tasks/{}", task_id);

    let (status, body) = ctx
        .request("PUT", &uri, Some(&token), Some(json!({"notAField": "x"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["title"], "unchanged");
    assert_eq!(body["task"]["status"], "pending");
}

#[tokio::test]
async fn test_update_clears_due_date_with_explicit_null() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("ivan").await;

    let task_id = ctx
        .create_task(&token, json!({"title": "dated", "dueDate": "2025-12-01"}))
        .await;
    let uri = format!("/tasks/{}", task_id);

    // Omitted dueDate leaves it unchanged
    let (_, body) = ctx
        .request("PUT", &uri, Some(&token), Some(json!({"title": "dated!"})))
        .await;
    assert!(!body["task"]["dueDate"].is_null());

    // Explicit null clears it
    let (status, body) = ctx
        .request("PUT", &uri, Some(&token), Some(json!({"dueDate": null})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["task"]["dueDate"].is_null());
}

#[tokio::test]
async fn test_update_clears_description_with_explicit_null() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("nina").await;

    let task_id = ctx
        .create_task(
            &token,
            json!({"title": "described", "description": "temporary notes"}),
        )
        .await;
    let uri = format!("/tasks/{}", task_id);

    // Omitted description leaves it unchanged
    let (_, body) = ctx
        .request("PUT", &uri, Some(&token), Some(json!({"title": "described!"})))
        .await;
    assert_eq!(body["task"]["description"], "temporary notes");

    // Explicit null clears it
    let (status, body) = ctx
        .request("PUT", &uri, Some(&token), Some(json!({"description": null})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["task"]["description"].is_null());

    // An empty string clears it too
    let (_, _) = ctx
        .request(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({"description": "restored"})),
        )
        .await;
    let (status, body) = ctx
        .request("PUT", &uri, Some(&token), Some(json!({"description": ""})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["task"]["description"].is_null());
}

#[tokio::test]
async fn test_list_filters_and_search() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("judy").await;

    ctx.create_task(&token, json!({"title": "Buy milk", "priority": "high"}))
        .await;
    ctx.create_task(&token, json!({"title": "MILK run"})).await;
    ctx.create_task(&token, json!({"title": "Buy bread", "status": "completed"}))
        .await;

    // Case-insensitive substring search
    let (status, body) = ctx.request("GET", "/tasks?q=milk", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Buy milk"));
    assert!(titles.contains(&"MILK run"));
    assert!(!titles.contains(&"Buy bread"));

    // Status filter
    let (_, body) = ctx
        .request("GET", "/tasks?status=completed", Some(&token), None)
        .await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(body["tasks"][0]["title"], "Buy bread");

    // Invalid enum value is a validation failure
    let (status, _) = ctx
        .request("GET", "/tasks?status=archived", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unparseable date bound is silently ignored, not an error
    let (status, body) = ctx
        .request("GET", "/tasks?dueFrom=garbage", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_sort_by_due_date_nulls_last() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("karl").await;

    ctx.create_task(&token, json!({"title": "later", "dueDate": "2025-12-01"}))
        .await;
    ctx.create_task(&token, json!({"title": "sooner", "dueDate": "2025-06-01"}))
        .await;
    ctx.create_task(&token, json!({"title": "undated"})).await;

    let (status, body) = ctx
        .request(
            "GET",
            "/tasks?sortBy=dueDate&sortOrder=asc",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["sooner", "later", "undated"]);
}

#[tokio::test]
async fn test_list_equal_due_dates_break_ties_by_id_desc() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("liam").await;

    let first = ctx
        .create_task(&token, json!({"title": "a", "dueDate": "2025-06-01"}))
        .await;
    let second = ctx
        .create_task(&token, json!({"title": "b", "dueDate": "2025-06-01"}))
        .await;

    let (_, body) = ctx
        .request(
            "GET",
            "/tasks?sortBy=dueDate&sortOrder=asc",
            Some(&token),
            None,
        )
        .await;

    let ids: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();

    // Equal due dates: id-descending tie-break yields a deterministic order
    let pos_first = ids.iter().position(|id| *id == first.to_string()).unwrap();
    let pos_second = ids.iter().position(|id| *id == second.to_string()).unwrap();
    assert!(
        (first > second) == (pos_first < pos_second),
        "larger id must sort first among equal due dates"
    );
}

#[tokio::test]
async fn test_task_round_trip() {
    let ctx = TestContext::new().await.unwrap();
    let (token, _, _) = ctx.register_user("mona").await;

    // Create
    let task_id = ctx
        .create_task(
            &token,
            json!({"title": "Round trip", "description": "full cycle"}),
        )
        .await;
    let uri = format!("/tasks/{}", task_id);

    // Get reflects created fields
    let (status, body) = ctx.request("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["title"], "Round trip");
    assert_eq!(body["task"]["description"], "full cycle");

    // Update reflects exactly the updated fields
    let (status, body) = ctx
        .request(
            "PUT",
            &uri,
            Some(&token),
            Some(json!({"title": "Round trip v2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["title"], "Round trip v2");
    assert_eq!(body["task"]["description"], "full cycle");

    // Delete acknowledges
    let (status, body) = ctx.request("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted");

    // Subsequent get is 404
    let (status, _) = ctx.request("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

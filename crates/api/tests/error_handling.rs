//! Tests for `AppError` → HTTP response mapping.
//!
//! The first group calls `IntoResponse` directly; the second drives the
//! router over a store that fails every call, checking that no internal
//! detail leaks to the client.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{body_json, FailingTodoRepo, TestApp};
use http_body_util::BodyExt;
use todos_api::error::AppError;
use todos_core::error::CoreError;
use todos_db::StoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Direct mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = uuid::Uuid::nil();
    let err = AppError::Core(CoreError::NotFound { entity: "Todo", id });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(
        json["error"],
        "Todo with id 00000000-0000-0000-0000-000000000000 not found"
    );
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("title is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "title is required");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn store_error_returns_500_and_sanitizes_message() {
    let err = AppError::Store(StoreError::Decode("secret keyspace layout".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(
        !json.to_string().contains("secret"),
        "Store error response must not leak internal details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn closed_store_returns_500() {
    let (status, _) = error_to_response(AppError::Store(StoreError::Closed)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn serialization_error_returns_500() {
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

    let (status, json) = error_to_response(AppError::Serialization(err)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

// ---------------------------------------------------------------------------
// Store failures through the router
// ---------------------------------------------------------------------------

async fn assert_sanitized_500(response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = body_json(response).await.to_string();
    assert!(!text.contains("10.0.0.7"), "leaked store detail: {text}");
    assert!(!text.contains("todo_app"), "leaked store detail: {text}");
}

#[tokio::test]
async fn every_operation_maps_store_failure_to_500() {
    let app = TestApp::with_repo(Arc::new(FailingTodoRepo));
    let id = uuid::Uuid::now_v7();

    assert_sanitized_500(app.post_json("/todos", r#"{"user_id":"u1","title":"t"}"#).await).await;
    assert_sanitized_500(app.get(&format!("/todos/{id}")).await).await;
    assert_sanitized_500(app.put_json(&format!("/todos/{id}"), r#"{"title":"t"}"#).await).await;
    assert_sanitized_500(app.delete(&format!("/todos/{id}")).await).await;
    assert_sanitized_500(app.get("/todos").await).await;
}

#[tokio::test]
async fn validation_runs_before_the_store_is_touched() {
    let app = TestApp::with_repo(Arc::new(FailingTodoRepo));

    let response = app.post_json("/todos", r#"{"user_id":"u1","title":""}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/todos/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/todos?page=x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn closed_store_fails_requests_with_500() {
    let app = TestApp::new();
    app.todos.close().await;

    let response = app.get("/todos").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

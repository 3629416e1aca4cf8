//! Message API Tests
//!
//! Validation paths that reject before any database work.

use axum::http::StatusCode;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn oversized_content_is_rejected_before_persistence() {
    let app = TestApp::new().await;
    let token = app.token_for(1);
    let body = serde_json::json!({
        "receiver_id": 2,
        "listing_id": 42,
        "content": "x".repeat(2001),
    });

    let response = app
        .post_json_auth("/api/v1/messages", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("content"));
}

#[tokio::test]
async fn empty_content_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for(1);
    let body = serde_json::json!({
        "receiver_id": 2,
        "listing_id": 42,
        "content": "",
    });

    let response = app
        .post_json_auth("/api/v1/messages", &body.to_string(), &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for(1);

    let response = app
        .post_json_auth("/api/v1/messages", r#"{"receiver_id": 2}"#, &token)
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

//! Live Stream API Tests

use axum::http::StatusCode;

use crate::common::TestApp;

#[tokio::test]
async fn stream_endpoint_opens_an_event_stream() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/messages/stream?user_id=7").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/event-stream"));
}

#[tokio::test]
async fn stream_endpoint_requires_user_id() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/messages/stream").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

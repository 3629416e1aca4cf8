//! Rate Limiting API Tests
//!
//! The limiter wraps the whole messaging API and runs before auth, so
//! unauthenticated requests still consume budget and rejections carry
//! no side effects.

use axum::http::StatusCode;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn requests_within_budget_are_not_throttled() {
    let app = TestApp::with_rate_limit(3).await;

    for _ in 0..3 {
        let response = app.get("/api/v1/messages/unread-count").await;
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}

#[tokio::test]
async fn request_over_budget_receives_429() {
    let app = TestApp::with_rate_limit(3).await;

    for _ in 0..3 {
        app.get("/api/v1/messages/unread-count").await;
    }

    let response = app.get("/api/v1/messages/unread-count").await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    let json = body_json(response).await;
    assert_eq!(json["rate_limit"]["remaining"], 0);
}

#[tokio::test]
async fn allowed_responses_expose_rate_limit_headers() {
    let app = TestApp::with_rate_limit(5).await;

    let response = app.get("/api/v1/messages/unread-count").await;

    assert_eq!(response.headers().get("x-ratelimit-limit").unwrap(), "5");
    assert_eq!(
        response.headers().get("x-ratelimit-remaining").unwrap(),
        "4"
    );
}

#[tokio::test]
async fn clients_are_throttled_independently() {
    let app = TestApp::with_rate_limit(1).await;

    let first = app
        .get_with_header(
            "/api/v1/messages/unread-count",
            "x-forwarded-for",
            "10.0.0.1",
        )
        .await;
    assert_ne!(first.status(), StatusCode::TOO_MANY_REQUESTS);

    let throttled = app
        .get_with_header(
            "/api/v1/messages/unread-count",
            "x-forwarded-for",
            "10.0.0.1",
        )
        .await;
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);

    let other_client = app
        .get_with_header(
            "/api/v1/messages/unread-count",
            "x-forwarded-for",
            "10.0.0.2",
        )
        .await;
    assert_ne!(other_client.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn health_endpoints_are_not_rate_limited() {
    let app = TestApp::with_rate_limit(1).await;

    app.get("/api/v1/messages/unread-count").await;
    app.get("/api/v1/messages/unread-count").await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

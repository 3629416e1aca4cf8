//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::live::stream_messages;
use crate::presentation::middleware::{auth_middleware, rate_limit_api, security};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1/messages", message_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Security headers apply to every response
        .layer(middleware::from_fn(security::security_headers))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// Messaging routes
///
/// The live stream endpoint identifies its user by query parameter and
/// stays outside the auth layer; everything else requires a bearer
/// token. Rate limiting wraps the whole group and runs before auth.
fn message_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(handlers::message::send_message))
        .route("/conversation", get(handlers::message::get_conversation))
        .route("/inbox", get(handlers::message::get_inbox))
        .route("/unread-count", get(handlers::message::unread_count))
        .route("/{id}/read", put(handlers::message::mark_read))
        .route("/conversations", get(handlers::message::get_conversations))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(protected)
        .route("/stream", get(stream_messages))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_api))
}

//! Rate Limiting Middleware
//!
//! In-process fixed-window rate limiting keyed by client identity.
//! Each client gets a counter and a window start; an expired window is
//! lazily reset before the request is counted, so a client that waits
//! out the window gets a fresh budget. Rejection happens before any
//! persistence is attempted.

use std::net::IpAddr;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;

use crate::config::RateLimitSettings;
use crate::infrastructure::metrics;
use crate::presentation::middleware::auth::AuthUser;
use crate::shared::error::ErrorResponse;
use crate::startup::AppState;

/// Rate limit status returned to clients in headers and 429 bodies.
#[derive(Debug, Serialize)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Seconds until the window restarts (0 when allowed)
    pub retry_after: u64,
}

/// Rate limit exceeded error response.
#[derive(Debug, Serialize)]
struct RateLimitExceededResponse {
    #[serde(flatten)]
    error: ErrorResponse,
    rate_limit: RateLimitInfo,
}

/// Per-client window state.
struct WindowRecord {
    count: u32,
    window_start: Instant,
}

/// Fixed-window rate limiter over a sharded concurrent map.
///
/// Read-modify-write is atomic per key (the map's entry guard), so
/// concurrent requests from one client cannot lose updates, and
/// unrelated clients never contend on a shared lock.
pub struct RateLimiter {
    records: DashMap<String, WindowRecord>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            records: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self::new(settings.max_requests, settings.window())
    }

    /// Check whether a request from `client_id` is admitted.
    ///
    /// Order matters: an expired window is reset first, then the request
    /// is counted against the (possibly fresh) budget. A previously
    /// unseen client starts a fresh record and is always admitted.
    pub fn check(&self, client_id: &str) -> Result<RateLimitInfo, RateLimitInfo> {
        let now = Instant::now();
        let mut record = self
            .records
            .entry(client_id.to_string())
            .or_insert_with(|| WindowRecord {
                count: 0,
                window_start: now,
            });

        if now.duration_since(record.window_start) > self.window {
            record.count = 0;
            record.window_start = now;
        }

        record.count += 1;

        if record.count <= self.max_requests {
            Ok(RateLimitInfo {
                limit: self.max_requests,
                remaining: self.max_requests - record.count,
                retry_after: 0,
            })
        } else {
            let elapsed = now.duration_since(record.window_start);
            let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);
            Err(RateLimitInfo {
                limit: self.max_requests,
                remaining: 0,
                retry_after,
            })
        }
    }

    /// The complete boolean contract: true means admitted.
    pub fn allow(&self, client_id: &str) -> bool {
        self.check(client_id).is_ok()
    }
}

/// Extract the rate limit identifier from a request.
///
/// Priority:
/// 1. Authenticated user ID (when an upstream layer resolved it)
/// 2. X-Forwarded-For header (for reverse proxy setups)
/// 3. X-Real-IP header (common with nginx)
/// 4. Connection IP address (fallback)
fn extract_identifier(request: &Request, client_ip: Option<IpAddr>) -> String {
    if let Some(auth_user) = request.extensions().get::<AuthUser>() {
        return format!("user:{}", auth_user.user_id);
    }

    // Note: X-Forwarded-For can be spoofed if not behind a trusted proxy
    if let Some(forwarded_for) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first_ip) = forwarded_for.split(',').next() {
            let ip = first_ip.trim();
            if ip.parse::<IpAddr>().is_ok() {
                return format!("ip:{}", ip);
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
    {
        if real_ip.parse::<IpAddr>().is_ok() {
            return format!("ip:{}", real_ip);
        }
    }

    match client_ip {
        Some(ip) => format!("ip:{}", ip),
        None => {
            tracing::warn!("Could not determine client identifier for rate limiting");
            "ip:unknown".to_string()
        }
    }
}

/// Rate limiting middleware for the messaging API.
///
/// Runs before authentication and persistence; a rejected request has
/// no side effects.
pub async fn rate_limit_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    // Connect info is present when the server is built with
    // into_make_service_with_connect_info; absent under test routers.
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip());
    let identifier = extract_identifier(&request, client_ip);

    match state.limiter.check(&identifier) {
        Ok(info) => {
            let mut response = next.run(request).await;
            add_rate_limit_headers(response.headers_mut(), &info);
            response
        }
        Err(info) => {
            metrics::RATE_LIMIT_REJECTIONS_TOTAL.inc();
            tracing::warn!(identifier = %identifier, "Rate limit exceeded");
            create_rate_limit_response(info)
        }
    }
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(headers: &mut header::HeaderMap, info: &RateLimitInfo) {
    if let Ok(v) = header::HeaderValue::from_str(&info.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = header::HeaderValue::from_str(&info.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
}

/// Create a 429 Too Many Requests response.
fn create_rate_limit_response(info: RateLimitInfo) -> Response {
    let retry_after = info.retry_after;
    let body = RateLimitExceededResponse {
        error: ErrorResponse {
            code: 10006,
            message: "You are being rate limited. Please slow down.".to_string(),
            errors: None,
        },
        rate_limit: info,
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    if let Ok(v) = header::HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, v);
    }

    response
}

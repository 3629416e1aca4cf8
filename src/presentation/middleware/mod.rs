//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;
pub mod rate_limit;
pub mod security;

pub use auth::{auth_middleware, issue_token, AuthUser};
pub use rate_limit::{rate_limit_api, RateLimitInfo, RateLimiter};

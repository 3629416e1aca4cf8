//! Presentation Layer
//!
//! HTTP routing, middleware, and live message delivery.

pub mod http;
pub mod live;
pub mod middleware;

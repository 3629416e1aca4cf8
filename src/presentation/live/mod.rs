//! Live Delivery
//!
//! Real-time new-message delivery over Server-Sent Events.

pub mod handler;
pub mod registry;

pub use handler::stream_messages;
pub use registry::{LiveChannelRegistry, LiveSubscription, SubscriptionGuard};

//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use validator::Validate;

/// Send message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub receiver_id: i64,

    pub listing_id: i64,

    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

/// Conversation history query parameters
#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub listing_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
}

/// Live stream query parameters
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub user_id: i64,
}

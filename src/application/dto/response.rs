//! Response DTOs
//!
//! Data structures for API response bodies. `MessageResponse` doubles as
//! the payload pushed over a live channel.

use serde::{Deserialize, Serialize};

use crate::application::services::{ConversationSummary, MessageDto};

/// Message response: the transfer representation of a stored message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_avatar_url: Option<String>,
    pub receiver_id: i64,
    pub receiver_name: String,
    pub listing_id: i64,
    pub listing_name: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<MessageDto> for MessageResponse {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: dto.id,
            sender_id: dto.sender_id,
            sender_name: dto.sender_name,
            sender_avatar_url: dto.sender_avatar_url,
            receiver_id: dto.receiver_id,
            receiver_name: dto.receiver_name,
            listing_id: dto.listing_id,
            listing_name: dto.listing_name,
            content: dto.content,
            is_read: dto.is_read,
            created_at: dto.created_at,
        }
    }
}

/// Conversation summary response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub listing_id: i64,
    pub listing_name: String,
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub last_message: String,
    pub timestamp: String,
}

impl From<ConversationSummary> for ConversationResponse {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            listing_id: summary.listing_id,
            listing_name: summary.listing_name,
            counterpart_id: summary.counterpart_id,
            counterpart_name: summary.counterpart_name,
            last_message: summary.last_message,
            timestamp: summary.timestamp.to_rfc3339(),
        }
    }
}

/// Unread count response
#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

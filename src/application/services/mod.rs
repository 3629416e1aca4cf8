//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! - **MessageService**: message persistence, history, inbox, unread
//!   tracking, mark-read
//! - **conversation**: pure aggregation of raw messages into
//!   per-counterpart conversation summaries

pub mod conversation;
pub mod message_service;

pub use conversation::{summarize_conversations, ConversationSummary};
pub use message_service::{
    MessageDto, MessageError, MessageService, MessageServiceImpl, SendMessageDto,
    MAX_CONTENT_LENGTH,
};

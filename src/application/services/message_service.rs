//! Message Service
//!
//! Handles message operations: send, conversation history, inbox, unread
//! count, mark-read, and conversation summaries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::services::conversation::{summarize_conversations, ConversationSummary};
use crate::domain::{
    Listing, ListingRepository, Message, MessageRecord, MessageRepository, NewMessage, User,
    UserRepository,
};
use crate::shared::error::AppError;

/// Maximum message content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Persist a new message from `sender_id`. The returned DTO is the
    /// transfer representation handed to the live delivery path.
    async fn send_message(
        &self,
        sender_id: i64,
        request: SendMessageDto,
    ) -> Result<MessageDto, MessageError>;

    /// Full history between an unordered user pair, scoped to a listing,
    /// oldest first.
    async fn get_conversation(
        &self,
        listing_id: i64,
        user_a: i64,
        user_b: i64,
    ) -> Result<Vec<MessageDto>, MessageError>;

    /// Every message the user sent or received, newest first.
    async fn get_inbox(&self, user_id: i64) -> Result<Vec<MessageDto>, MessageError>;

    /// Count of unread messages addressed to the user.
    async fn unread_count(&self, user_id: i64) -> Result<i64, MessageError>;

    /// Mark a message read. Idempotent.
    async fn mark_read(&self, message_id: i64) -> Result<(), MessageError>;

    /// One summary per distinct (counterpart, listing) pair.
    async fn get_conversations(
        &self,
        user_id: i64,
    ) -> Result<Vec<ConversationSummary>, MessageError>;
}

/// Send message request
#[derive(Debug, Clone)]
pub struct SendMessageDto {
    pub receiver_id: i64,
    pub listing_id: i64,
    pub content: String,
}

/// Message data transfer object
#[derive(Debug, Clone)]
pub struct MessageDto {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub sender_avatar_url: Option<String>,
    pub receiver_id: i64,
    pub receiver_name: String,
    pub listing_id: i64,
    pub listing_name: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<MessageRecord> for MessageDto {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            sender_id: record.sender_id,
            sender_name: record.sender_name,
            sender_avatar_url: record.sender_avatar_url,
            receiver_id: record.receiver_id,
            receiver_name: record.receiver_name,
            listing_id: record.listing_id,
            listing_name: record.listing_name,
            content: record.content,
            is_read: record.is_read,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

impl MessageDto {
    /// Build the transfer representation from a freshly inserted row plus
    /// the participants and listing resolved during validation.
    fn hydrate(message: Message, sender: &User, receiver: &User, listing: &Listing) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            sender_name: sender.name.clone(),
            sender_avatar_url: sender.avatar_url.clone(),
            receiver_id: message.receiver_id,
            receiver_name: receiver.name.clone(),
            listing_id: message.listing_id,
            listing_name: listing.name.clone(),
            content: message.content,
            is_read: message.is_read,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Message not found")]
    NotFound,

    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("Listing {0} not found")]
    ListingNotFound(i64),

    #[error("Message too long")]
    ContentTooLong,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MessageError {
    fn from_repo(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => MessageError::NotFound,
            other => MessageError::Internal(other.to_string()),
        }
    }
}

/// MessageService implementation
pub struct MessageServiceImpl<M, U, L>
where
    M: MessageRepository,
    U: UserRepository,
    L: ListingRepository,
{
    message_repo: Arc<M>,
    user_repo: Arc<U>,
    listing_repo: Arc<L>,
}

impl<M, U, L> MessageServiceImpl<M, U, L>
where
    M: MessageRepository,
    U: UserRepository,
    L: ListingRepository,
{
    pub fn new(message_repo: Arc<M>, user_repo: Arc<U>, listing_repo: Arc<L>) -> Self {
        Self {
            message_repo,
            user_repo,
            listing_repo,
        }
    }

    async fn resolve_user(&self, id: i64) -> Result<User, MessageError> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?
            .ok_or(MessageError::UserNotFound(id))
    }
}

#[async_trait]
impl<M, U, L> MessageService for MessageServiceImpl<M, U, L>
where
    M: MessageRepository + 'static,
    U: UserRepository + 'static,
    L: ListingRepository + 'static,
{
    async fn send_message(
        &self,
        sender_id: i64,
        request: SendMessageDto,
    ) -> Result<MessageDto, MessageError> {
        if request.content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(MessageError::ContentTooLong);
        }

        let sender = self.resolve_user(sender_id).await?;
        let receiver = self.resolve_user(request.receiver_id).await?;

        let listing = self
            .listing_repo
            .find_by_id(request.listing_id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?
            .ok_or(MessageError::ListingNotFound(request.listing_id))?;

        // Persistence is the commit point. Live delivery happens after this
        // returns and never affects the stored message.
        let created = self
            .message_repo
            .insert(NewMessage {
                sender_id,
                receiver_id: receiver.id,
                listing_id: listing.id,
                content: request.content,
            })
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        tracing::debug!(
            message_id = created.id,
            sender_id,
            receiver_id = receiver.id,
            listing_id = listing.id,
            "Message persisted"
        );

        Ok(MessageDto::hydrate(created, &sender, &receiver, &listing))
    }

    async fn get_conversation(
        &self,
        listing_id: i64,
        user_a: i64,
        user_b: i64,
    ) -> Result<Vec<MessageDto>, MessageError> {
        let records = self
            .message_repo
            .find_conversation(listing_id, user_a, user_b)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        Ok(records.into_iter().map(MessageDto::from).collect())
    }

    async fn get_inbox(&self, user_id: i64) -> Result<Vec<MessageDto>, MessageError> {
        let records = self
            .message_repo
            .find_for_user(user_id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        Ok(records.into_iter().map(MessageDto::from).collect())
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64, MessageError> {
        self.message_repo
            .count_unread(user_id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))
    }

    async fn mark_read(&self, message_id: i64) -> Result<(), MessageError> {
        self.message_repo
            .mark_read(message_id)
            .await
            .map_err(MessageError::from_repo)
    }

    async fn get_conversations(
        &self,
        user_id: i64,
    ) -> Result<Vec<ConversationSummary>, MessageError> {
        let records = self
            .message_repo
            .find_for_user(user_id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        Ok(summarize_conversations(user_id, &records))
    }
}

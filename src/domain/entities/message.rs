//! Message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A message exchanged between two users about a listing.
///
/// Maps to the `messages` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - sender_id: BIGINT NOT NULL REFERENCES users(id)
/// - receiver_id: BIGINT NOT NULL REFERENCES users(id)
/// - listing_id: BIGINT NOT NULL REFERENCES listings(id)
/// - content: TEXT NOT NULL (max 2000 characters)
/// - is_read: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// Messages are immutable once written except for `is_read`, which is
/// flipped at most once by the mark-read operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub listing_id: i64,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to persist a new message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub listing_id: i64,
    pub content: String,
}

/// Read model for message queries: a message row joined with the display
/// names of both participants and the listing.
#[derive(Debug, Clone)]
pub struct MessageRecord {
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
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// The other participant's id, relative to `user_id`.
    pub fn counterpart_id(&self, user_id: i64) -> i64 {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    /// The other participant's display name, relative to `user_id`.
    pub fn counterpart_name(&self, user_id: i64) -> &str {
        if self.sender_id == user_id {
            &self.receiver_name
        } else {
            &self.sender_name
        }
    }
}

/// Repository trait for message data access operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message. Returns the stored row with its assigned
    /// identity and timestamp.
    async fn insert(&self, new: NewMessage) -> Result<Message, AppError>;

    /// All messages between the unordered pair {user_a, user_b} scoped to
    /// one listing, ascending by timestamp (ties broken by id).
    async fn find_conversation(
        &self,
        listing_id: i64,
        user_a: i64,
        user_b: i64,
    ) -> Result<Vec<MessageRecord>, AppError>;

    /// Every message where the user is sender or receiver, descending by
    /// timestamp (ties broken by id).
    async fn find_for_user(&self, user_id: i64) -> Result<Vec<MessageRecord>, AppError>;

    /// Count of unread messages addressed to the user.
    async fn count_unread(&self, user_id: i64) -> Result<i64, AppError>;

    /// Flip the read flag. Idempotent: a second call on the same id is a
    /// no-op. Fails with NotFound if the id does not resolve.
    async fn mark_read(&self, id: i64) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sender_id: i64, receiver_id: i64) -> MessageRecord {
        MessageRecord {
            id: 1,
            sender_id,
            sender_name: "Alice".into(),
            sender_avatar_url: None,
            receiver_id,
            receiver_name: "Bob".into(),
            listing_id: 42,
            listing_name: "Rex".into(),
            content: "Is Rex still available?".into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counterpart_is_receiver_when_user_sent() {
        let r = record(1, 2);
        assert_eq!(r.counterpart_id(1), 2);
        assert_eq!(r.counterpart_name(1), "Bob");
    }

    #[test]
    fn counterpart_is_sender_when_user_received() {
        let r = record(1, 2);
        assert_eq!(r.counterpart_id(2), 1);
        assert_eq!(r.counterpart_name(2), "Alice");
    }
}

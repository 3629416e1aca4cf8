//! Message Repository Implementation
//!
//! PostgreSQL implementation of message persistence: the durable
//! append-only record of exchanged messages, keyed by (listing,
//! participant pair).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Message, MessageRecord, MessageRepository, NewMessage};
use crate::shared::error::AppError;

/// PostgreSQL message repository implementation.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Creates a new PgMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for plain message queries.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    sender_id: i64,
    receiver_id: i64,
    listing_id: i64,
    content: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            listing_id: self.listing_id,
            content: self.content,
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}

/// Internal row type for hydrated message queries (joined display names).
#[derive(Debug, sqlx::FromRow)]
struct MessageRecordRow {
    id: i64,
    sender_id: i64,
    sender_name: String,
    sender_avatar_url: Option<String>,
    receiver_id: i64,
    receiver_name: String,
    listing_id: i64,
    listing_name: String,
    content: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl MessageRecordRow {
    fn into_record(self) -> MessageRecord {
        MessageRecord {
            id: self.id,
            sender_id: self.sender_id,
            sender_name: self.sender_name,
            sender_avatar_url: self.sender_avatar_url,
            receiver_id: self.receiver_id,
            receiver_name: self.receiver_name,
            listing_id: self.listing_id,
            listing_name: self.listing_name,
            content: self.content,
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}

/// Shared SELECT head joining both participants and the listing.
const RECORD_SELECT: &str = r#"
    SELECT m.id, m.sender_id, su.name AS sender_name,
           su.avatar_url AS sender_avatar_url,
           m.receiver_id, ru.name AS receiver_name,
           m.listing_id, l.name AS listing_name,
           m.content, m.is_read, m.created_at
    FROM messages m
    JOIN users su ON su.id = m.sender_id
    JOIN users ru ON ru.id = m.receiver_id
    JOIN listings l ON l.id = m.listing_id
"#;

#[async_trait]
impl MessageRepository for PgMessageRepository {
    /// Persist a new message.
    ///
    /// Identity and timestamp are assigned by the database so that ids
    /// reflect insertion order.
    async fn insert(&self, new: NewMessage) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (sender_id, receiver_id, listing_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_id, receiver_id, listing_id, content, is_read, created_at
            "#,
        )
        .bind(new.sender_id)
        .bind(new.receiver_id)
        .bind(new.listing_id)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    /// Find all messages between the unordered pair {user_a, user_b}
    /// scoped to one listing.
    ///
    /// Ordered ascending by timestamp, with id as the stable tie-break.
    async fn find_conversation(
        &self,
        listing_id: i64,
        user_a: i64,
        user_b: i64,
    ) -> Result<Vec<MessageRecord>, AppError> {
        let query = format!(
            r#"{RECORD_SELECT}
            WHERE m.listing_id = $1
              AND ((m.sender_id = $2 AND m.receiver_id = $3)
                OR (m.sender_id = $3 AND m.receiver_id = $2))
            ORDER BY m.created_at ASC, m.id ASC
            "#
        );

        let rows = sqlx::query_as::<_, MessageRecordRow>(&query)
            .bind(listing_id)
            .bind(user_a)
            .bind(user_b)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }

    /// Find every message where the user is sender or receiver, newest
    /// first.
    async fn find_for_user(&self, user_id: i64) -> Result<Vec<MessageRecord>, AppError> {
        let query = format!(
            r#"{RECORD_SELECT}
            WHERE m.sender_id = $1 OR m.receiver_id = $1
            ORDER BY m.created_at DESC, m.id DESC
            "#
        );

        let rows = sqlx::query_as::<_, MessageRecordRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_record()).collect())
    }

    /// Count unread messages addressed to the user.
    async fn count_unread(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Flip the read flag.
    ///
    /// The UPDATE matches already-read rows as well, so a repeated call
    /// affects one row and changes nothing: the operation is idempotent.
    /// Zero affected rows means the id does not resolve.
    async fn mark_read(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE messages SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Message {} not found", id)));
        }

        Ok(())
    }
}

//! User entity and repository trait.
//!
//! The messaging core treats identity as resolved elsewhere (JWT issued by
//! the identity service); this entity carries only what message delivery
//! needs: a stable id and display fields.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A marketplace user, as seen by the messaging core.
///
/// Maps to the `users` table (id, name, avatar_url, created_at).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for user lookups.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Resolve a user identity. Returns None if the id does not exist.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}

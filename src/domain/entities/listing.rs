//! Listing entity and repository trait.
//!
//! Listing CRUD and search live outside the messaging core; this trait is
//! the lookup boundary used to validate that a conversation's listing
//! exists and to fetch its display name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// An adoptable-pet listing a conversation is scoped to.
///
/// Maps to the `listings` table (id, name, owner_id, created_at).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for listing lookups.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Resolve a listing identity. Returns None if the id does not exist.
    async fn find_by_id(&self, id: i64) -> Result<Option<Listing>, AppError>;
}

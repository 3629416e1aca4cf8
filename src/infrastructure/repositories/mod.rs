//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.

mod listing_repository;
mod message_repository;
mod user_repository;

pub use listing_repository::PgListingRepository;
pub use message_repository::PgMessageRepository;
pub use user_repository::PgUserRepository;

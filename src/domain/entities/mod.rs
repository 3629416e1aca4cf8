//! # Domain Entities
//!
//! Core domain entities for the messaging subsystem. All entities map
//! directly to their corresponding database tables.
//!
//! ## Entities
//!
//! - **Message**: A text message between two users about a listing
//! - **User**: A marketplace user (identity and display fields only)
//! - **Listing**: The adoptable-pet record a conversation is scoped to
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod listing;
mod message;
mod user;

pub use listing::{Listing, ListingRepository};
pub use message::{Message, MessageRecord, MessageRepository, NewMessage};
pub use user::{User, UserRepository};

#[cfg(test)]
pub use listing::MockListingRepository;
#[cfg(test)]
pub use message::MockMessageRepository;
#[cfg(test)]
pub use user::MockUserRepository;

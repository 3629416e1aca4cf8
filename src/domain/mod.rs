//! # Domain Layer
//!
//! The domain layer contains the core business entities of the messaging
//! subsystem. It is independent of any external frameworks or
//! infrastructure concerns.
//!
//! - **entities**: Core domain entities (Message, User, Listing)
//! - Repository traits define data access contracts implemented by the
//!   infrastructure layer

pub mod entities;

// Re-export commonly used types
pub use entities::*;

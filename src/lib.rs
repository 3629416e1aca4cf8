//! # Pawmarket Messaging Service
//!
//! Backend messaging core for a pet adoption marketplace:
//! - Direct messages between users, scoped to an adoption listing
//! - Conversation summaries (one per counterpart and listing pair)
//! - Real-time delivery over Server-Sent Events
//! - Per-client fixed-window rate limiting
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core entities and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database access and metrics
//! - **Presentation Layer**: HTTP handlers, middleware, live delivery
//!
//! ## Module Structure
//!
//! ```text
//! pawmarket/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities and repository traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Database and metrics implementations
//! +-- presentation/   HTTP routes, middleware, live channels
//! +-- shared/         Common utilities (errors, validation)
//! ```

pub mod config;

pub mod domain;

pub mod application;

pub mod infrastructure;

pub mod presentation;

pub mod shared;

pub mod startup;

pub mod telemetry;

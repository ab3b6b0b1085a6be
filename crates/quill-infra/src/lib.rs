//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory repository only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `auth` - JWT identity provider

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryBlogRepository};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::{PostgresCommentRepository, PostgresPostRepository};

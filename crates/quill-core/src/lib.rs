//! # Quill Core
//!
//! The domain layer of Quill.
//! Entities, validation, authorization, the post filter pipeline, comment
//! moderation and the use cases that tie them together. Storage and identity
//! are reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{AuthorizationError, DomainError, RepoError};
pub use service::BlogService;

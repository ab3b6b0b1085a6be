//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::ValidationErrors;

/// Domain errors - the typed outcome of every failed use case.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error("Repository failure: {0}")]
    Repository(#[from] RepoError),
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id,
        }
    }

    pub fn comment_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity_type: "Comment",
            id,
        }
    }
}

/// Why an actor was refused a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Only the owner of this post may change it")]
    NotOwner,

    #[error("Not allowed to moderate comments on this post")]
    NotModerator,
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

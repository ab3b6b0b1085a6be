use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::RepoError;

/// Generic repository trait defining lookup, upsert and update.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `RepoError::NotFound` when it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Every post, unfiltered, oldest first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Remove a post and all of its comments as one atomic step.
    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Comment repository. Comments are only ever removed with their post.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

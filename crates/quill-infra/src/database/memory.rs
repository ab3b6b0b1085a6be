//! In-memory repository - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository};

#[derive(Default)]
struct Store {
    /// Insertion order is the listing order.
    posts: Vec<Post>,
    /// Comment arena keyed by post id.
    comments: HashMap<Uuid, Vec<Comment>>,
}

impl Store {
    fn post_index(&self, id: Uuid) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }
}

/// In-memory post and comment storage behind a single async RwLock.
///
/// One lock guards both collections, so a cascade delete is never observed
/// half done. Note: data is lost on process restart.
pub struct InMemoryBlogRepository {
    store: RwLock<Store>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }
}

impl Default for InMemoryBlogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        match store.post_index(post.id) {
            Some(index) => {
                if store.posts[index].owner_id != post.owner_id {
                    return Err(RepoError::Constraint("post owner is immutable".to_string()));
                }
                store.posts[index] = post.clone();
            }
            None => store.posts.push(post.clone()),
        }

        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        let index = store.post_index(post.id).ok_or(RepoError::NotFound)?;
        if store.posts[index].owner_id != post.owner_id {
            return Err(RepoError::Constraint("post owner is immutable".to_string()));
        }
        store.posts[index] = post.clone();

        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.clone())
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;

        let index = store.post_index(id).ok_or(RepoError::NotFound)?;
        store.posts.remove(index);
        let removed = store.comments.remove(&id).map_or(0, |c| c.len());

        tracing::debug!(post_id = %id, comments = removed, "Post removed from memory");
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .comments
            .values()
            .flatten()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut store = self.store.write().await;

        if store.post_index(comment.post_id).is_none() {
            return Err(RepoError::Constraint(format!(
                "comment references missing post {}",
                comment.post_id
            )));
        }

        let thread = store.comments.entry(comment.post_id).or_default();
        match thread.iter_mut().find(|c| c.id == comment.id) {
            Some(existing) => *existing = comment.clone(),
            None => thread.push(comment.clone()),
        }

        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut store = self.store.write().await;

        let existing = store
            .comments
            .get_mut(&comment.post_id)
            .and_then(|thread| thread.iter_mut().find(|c| c.id == comment.id))
            .ok_or(RepoError::NotFound)?;
        *existing = comment.clone();

        Ok(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.read().await;
        Ok(store.comments.get(&post_id).cloned().unwrap_or_default())
    }
}

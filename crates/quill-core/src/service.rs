//! Use cases: the operations exposed to the outside world.
//!
//! Every operation takes the acting user explicitly. Mutations follow the
//! same shape: load, check, validate, then a single repository write.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Actor, Comment, CommentInput, Post, PostChanges, PostInput, PostQuery, User, guard,
    moderation, validate_comment, validate_post,
};
use crate::error::{AuthorizationError, DomainError, RepoError};
use crate::ports::{CommentRepository, PostRepository};

/// A post together with the comments its viewer may see, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Blog use cases over the repository ports.
#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Published posts, optionally narrowed by `search`, newest first.
    pub async fn list_posts(&self, search: Option<&str>) -> Result<Vec<Post>, DomainError> {
        let posts = self.posts.list().await?;
        let listed: Vec<Post> = PostQuery::public().search(search).apply(posts).collect();

        tracing::debug!(count = listed.len(), search = ?search, "Listed published posts");
        Ok(listed)
    }

    /// The actor's own posts, drafts included, newest first.
    pub async fn list_own_posts(
        &self,
        actor: &Actor,
        search: Option<&str>,
    ) -> Result<Vec<Post>, DomainError> {
        let user = require_user(actor)?;
        let posts = self.posts.list().await?;

        Ok(PostQuery::new()
            .by_user(user.id)
            .search(search)
            .recent()
            .apply(posts)
            .collect())
    }

    /// A single post with its visible comments. Drafts resolve for their owner only.
    pub async fn view_post(&self, actor: &Actor, id: Uuid) -> Result<PostView, DomainError> {
        let viewer = actor.user();
        let post = self.find_post(id).await?;
        if !guard::can_view(&post, viewer) {
            return Err(DomainError::post_not_found(id));
        }

        let comments = self.comments.list_for_post(post.id).await?;
        let comments = moderation::visible_comments(&post, comments, viewer).collect();

        Ok(PostView { post, comments })
    }

    pub async fn create_post(&self, actor: &Actor, input: PostInput) -> Result<Post, DomainError> {
        let user = require_user(actor)?;
        let fields = validate_post(input)?;

        let post = self.posts.save(Post::new(user.id, fields)).await?;
        tracing::info!(post_id = %post.id, owner_id = %user.id, published = post.published, "Post created");
        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let user = require_user(actor)?;
        let mut post = self.find_owned_post(user, id).await?;

        let fields = validate_post(changes.merge_onto(&post))?;
        post.apply(fields);

        let post = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(id),
            other => other.into(),
        })?;
        tracing::info!(post_id = %post.id, published = post.published, "Post updated");
        Ok(post)
    }

    /// Delete a post and, with it, every comment on it.
    pub async fn delete_post(&self, actor: &Actor, id: Uuid) -> Result<(), DomainError> {
        let user = require_user(actor)?;
        let post = self.find_owned_post(user, id).await?;

        self.posts.delete_cascade(post.id).await?;
        tracing::info!(post_id = %post.id, "Post deleted with its comments");
        Ok(())
    }

    /// Attach a pending comment to a post the actor can see.
    pub async fn add_comment(
        &self,
        actor: &Actor,
        post_id: Uuid,
        content: impl Into<String>,
    ) -> Result<Comment, DomainError> {
        let user = require_user(actor)?;
        let post = self.find_post(post_id).await?;
        if !guard::can_view(&post, Some(user)) {
            return Err(DomainError::post_not_found(post_id));
        }

        let fields = validate_comment(CommentInput::new(content))?;
        // The post may be deleted after it was loaded; its comments go with it.
        let comment = self
            .comments
            .save(Comment::new(post.id, user.id, fields))
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) | RepoError::NotFound => {
                    DomainError::post_not_found(post_id)
                }
                other => other.into(),
            })?;

        tracing::info!(comment_id = %comment.id, post_id = %post.id, author_id = %user.id, "Comment submitted for moderation");
        Ok(comment)
    }

    pub async fn approve_comment(
        &self,
        actor: &Actor,
        comment_id: Uuid,
    ) -> Result<Comment, DomainError> {
        let user = require_user(actor)?;
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::comment_not_found(comment_id))?;
        let post = self.find_post(comment.post_id).await?;

        let post_visible = guard::can_view(&post, Some(user)) || user.is_moderator();
        if !post_visible || !moderation::is_visible_to(&comment, &post, Some(user)) {
            return Err(DomainError::comment_not_found(comment_id));
        }

        let approved = moderation::approve(comment, &post, user).inspect_err(|_| {
            tracing::warn!(%comment_id, user_id = %user.id, "Comment approval refused");
        })?;

        let approved = self.comments.update(approved).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::comment_not_found(comment_id),
            other => other.into(),
        })?;
        tracing::info!(%comment_id, post_id = %post.id, "Comment approved");
        Ok(approved)
    }

    async fn find_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Load a post for mutation. Drafts of other users look missing.
    async fn find_owned_post(&self, user: &User, id: Uuid) -> Result<Post, DomainError> {
        let post = self.find_post(id).await?;
        if !guard::can_view(&post, Some(user)) {
            return Err(DomainError::post_not_found(id));
        }
        if !guard::can_mutate(&post, user) {
            tracing::warn!(post_id = %id, user_id = %user.id, "Post mutation refused: not owner");
            return Err(AuthorizationError::NotOwner.into());
        }
        Ok(post)
    }
}

fn require_user(actor: &Actor) -> Result<&User, DomainError> {
    actor
        .user()
        .ok_or(DomainError::Unauthorized(AuthorizationError::Unauthenticated))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{MODERATOR_ROLE, Rule};
    use crate::ports::BaseRepository;

    #[derive(Default)]
    struct FakeStore {
        posts: Mutex<Vec<Post>>,
        comments: Mutex<Vec<Comment>>,
        writes: Mutex<usize>,
        /// Delete each post right after it is read, as a concurrent request would.
        delete_behind_reads: Mutex<bool>,
    }

    impl FakeStore {
        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }

        fn comment_count(&self, post_id: Uuid) -> usize {
            self.comments
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.post_id == post_id)
                .count()
        }

        fn bump(&self) {
            *self.writes.lock().unwrap() += 1;
        }

        fn delete_behind_reads(&self) {
            *self.delete_behind_reads.lock().unwrap() = true;
        }

        fn post_exists(&self, id: Uuid) -> bool {
            self.posts.lock().unwrap().iter().any(|p| p.id == id)
        }

        fn remove_post(&self, id: Uuid) {
            self.posts.lock().unwrap().retain(|p| p.id != id);
            self.comments.lock().unwrap().retain(|c| c.post_id != id);
        }
    }

    #[async_trait]
    impl BaseRepository<Post, Uuid> for FakeStore {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
            let found = self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned();
            if *self.delete_behind_reads.lock().unwrap() {
                self.remove_post(id);
            }
            Ok(found)
        }

        async fn save(&self, post: Post) -> Result<Post, RepoError> {
            self.bump();
            let mut posts = self.posts.lock().unwrap();
            match posts.iter_mut().find(|p| p.id == post.id) {
                Some(existing) => *existing = post.clone(),
                None => posts.push(post.clone()),
            }
            Ok(post)
        }

        async fn update(&self, post: Post) -> Result<Post, RepoError> {
            self.bump();
            let mut posts = self.posts.lock().unwrap();
            let existing = posts
                .iter_mut()
                .find(|p| p.id == post.id)
                .ok_or(RepoError::NotFound)?;
            *existing = post.clone();
            Ok(post)
        }
    }

    #[async_trait]
    impl PostRepository for FakeStore {
        async fn list(&self) -> Result<Vec<Post>, RepoError> {
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError> {
            self.bump();
            self.remove_post(id);
            Ok(())
        }
    }

    #[async_trait]
    impl BaseRepository<Comment, Uuid> for FakeStore {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
            Ok(self
                .comments
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned())
        }

        async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
            self.bump();
            if !self.post_exists(comment.post_id) {
                return Err(RepoError::Constraint("missing post".to_string()));
            }
            let mut comments = self.comments.lock().unwrap();
            match comments.iter_mut().find(|c| c.id == comment.id) {
                Some(existing) => *existing = comment.clone(),
                None => comments.push(comment.clone()),
            }
            Ok(comment)
        }

        async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
            self.bump();
            let mut comments = self.comments.lock().unwrap();
            let existing = comments
                .iter_mut()
                .find(|c| c.id == comment.id)
                .ok_or(RepoError::NotFound)?;
            *existing = comment.clone();
            Ok(comment)
        }
    }

    #[async_trait]
    impl CommentRepository for FakeStore {
        async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
            Ok(self
                .comments
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.post_id == post_id)
                .cloned()
                .collect())
        }
    }

    fn setup() -> (Arc<FakeStore>, BlogService) {
        let store = Arc::new(FakeStore::default());
        let service = BlogService::new(store.clone(), store.clone());
        (store, service)
    }

    fn actor() -> Actor {
        Actor::User(User::new(Uuid::new_v4()))
    }

    fn published(title: &str, content: &str) -> PostInput {
        PostInput::new(title, content).published(true)
    }

    #[tokio::test]
    async fn test_create_requires_authentication() {
        let (store, service) = setup();
        let err = service
            .create_post(&Actor::Anonymous, published("Hello world", "Long enough content"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::Unauthorized(AuthorizationError::Unauthenticated)
        ));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_create_reports_all_validation_errors() {
        let (store, service) = setup();
        let err = service
            .create_post(&actor(), PostInput::new("abc", "short"))
            .await
            .unwrap_err();

        let DomainError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.has("title", Rule::TooShort));
        assert!(errors.has("content", Rule::TooShort));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_round_trip_through_repository() {
        let (_, service) = setup();
        let author = actor();
        let created = service
            .create_post(&author, published("Round trip", "Content that survives"))
            .await
            .unwrap();

        let view = service.view_post(&Actor::Anonymous, created.id).await.unwrap();
        assert_eq!(view.post, created);
        assert_eq!(view.post.owner_id, author.user().unwrap().id);
        assert!(view.comments.is_empty());
    }

    #[tokio::test]
    async fn test_list_posts_public_and_searchable() {
        let (_, service) = setup();
        let author = actor();
        service
            .create_post(
                &author,
                published("Getting Started with Ruby on Rails", "Install and scaffold."),
            )
            .await
            .unwrap();
        service
            .create_post(&author, published("Database Design", "Tables, keys and indexes."))
            .await
            .unwrap();
        service
            .create_post(&author, PostInput::new("Rails draft", "Not yet ready to publish"))
            .await
            .unwrap();

        let all = service.list_posts(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|p| p.published));

        let found = service.list_posts(Some("rails")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Getting Started with Ruby on Rails");

        let mine = service.list_own_posts(&author, Some("rails")).await.unwrap();
        assert_eq!(mine.len(), 2);
    }

    #[tokio::test]
    async fn test_drafts_hidden_from_others() {
        let (_, service) = setup();
        let owner = actor();
        let draft = service
            .create_post(&owner, PostInput::new("Secret draft", "Work in progress text"))
            .await
            .unwrap();

        assert!(service.view_post(&owner, draft.id).await.is_ok());
        assert!(matches!(
            service.view_post(&actor(), draft.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.update_post(&actor(), draft.id, PostChanges::default()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let (store, service) = setup();
        let owner = actor();
        let post = service
            .create_post(&owner, published("Owned post", "Only the owner edits this"))
            .await
            .unwrap();
        let writes = store.writes();

        let intruder = actor();
        let changes = PostChanges {
            title: Some("Hijacked title".to_string()),
            ..Default::default()
        };
        let err = service.update_post(&intruder, post.id, changes).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Unauthorized(AuthorizationError::NotOwner)
        ));

        let err = service.delete_post(&intruder, post.id).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Unauthorized(AuthorizationError::NotOwner)
        ));

        assert_eq!(store.writes(), writes);
        let view = service.view_post(&Actor::Anonymous, post.id).await.unwrap();
        assert_eq!(view.post, post);
    }

    #[tokio::test]
    async fn test_owner_update_keeps_unspecified_fields() {
        let (_, service) = setup();
        let owner = actor();
        let post = service
            .create_post(&owner, published("Original title", "Original content body"))
            .await
            .unwrap();

        let updated = service
            .update_post(
                &owner,
                post.id,
                PostChanges {
                    title: Some("Updated title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Updated title");
        assert_eq!(updated.content, "Original content body");
        assert!(updated.published);
        assert_eq!(updated.created_at, post.created_at);

        let err = service
            .update_post(
                &owner,
                post.id,
                PostChanges {
                    content: Some("tiny".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_comments() {
        let (store, service) = setup();
        let owner = actor();
        let post = service
            .create_post(&owner, published("Soon gone", "This post will be deleted"))
            .await
            .unwrap();
        for i in 0..3 {
            service
                .add_comment(&actor(), post.id, format!("Comment number {i}"))
                .await
                .unwrap();
        }
        assert_eq!(store.comment_count(post.id), 3);

        service.delete_post(&owner, post.id).await.unwrap();

        assert_eq!(store.comment_count(post.id), 0);
        assert!(matches!(
            service.view_post(&owner, post.id).await,
            Err(DomainError::NotFound {
                entity_type: "Post",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_comment_on_missing_post_writes_nothing() {
        let (store, service) = setup();
        let err = service
            .add_comment(&actor(), Uuid::new_v4(), "Hello there")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_comment_moderation_flow() {
        let (_, service) = setup();
        let owner = actor();
        let commenter = actor();
        let stranger = actor();
        let post = service
            .create_post(&owner, published("Moderated", "Comments start out pending"))
            .await
            .unwrap();

        let comment = service
            .add_comment(&commenter, post.id, "Great read")
            .await
            .unwrap();
        assert!(comment.is_pending_approval());

        let visible = |view: PostView| view.comments.len();
        assert_eq!(visible(service.view_post(&owner, post.id).await.unwrap()), 1);
        assert_eq!(visible(service.view_post(&commenter, post.id).await.unwrap()), 1);
        assert_eq!(visible(service.view_post(&stranger, post.id).await.unwrap()), 0);

        let err = service
            .approve_comment(&commenter, comment.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Unauthorized(AuthorizationError::NotModerator)
        ));
        assert!(matches!(
            service.approve_comment(&stranger, comment.id).await,
            Err(DomainError::NotFound { .. })
        ));

        let approved = service.approve_comment(&owner, comment.id).await.unwrap();
        assert!(approved.is_approved());
        assert_eq!(visible(service.view_post(&stranger, post.id).await.unwrap()), 1);
        assert_eq!(
            visible(service.view_post(&Actor::Anonymous, post.id).await.unwrap()),
            1
        );
    }

    #[tokio::test]
    async fn test_moderator_can_approve() {
        let (_, service) = setup();
        let post = service
            .create_post(&actor(), published("Busy post", "Lots of comments here"))
            .await
            .unwrap();
        let comment = service
            .add_comment(&actor(), post.id, "Needs review")
            .await
            .unwrap();

        let moderator = Actor::User(User::with_roles(
            Uuid::new_v4(),
            vec![MODERATOR_ROLE.to_string()],
        ));
        let approved = service.approve_comment(&moderator, comment.id).await.unwrap();
        assert!(approved.approved);
    }

    #[tokio::test]
    async fn test_comment_validation() {
        let (store, service) = setup();
        let post = service
            .create_post(&actor(), published("Commented", "Comment validation test"))
            .await
            .unwrap();
        let writes = store.writes();

        let err = service
            .add_comment(&actor(), post.id, "no")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_update_does_not_resurrect_deleted_post() {
        let (store, service) = setup();
        let owner = actor();
        let post = service
            .create_post(&owner, published("Short lived", "Deleted while being edited"))
            .await
            .unwrap();

        store.delete_behind_reads();
        let err = service
            .update_post(
                &owner,
                post.id,
                PostChanges {
                    title: Some("Edited title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::NotFound {
                entity_type: "Post",
                ..
            }
        ));
        assert!(!store.post_exists(post.id));
    }

    #[tokio::test]
    async fn test_comment_on_post_deleted_meanwhile() {
        let (store, service) = setup();
        let owner = actor();
        let post = service
            .create_post(&owner, published("Short lived", "Deleted while commenting"))
            .await
            .unwrap();
        let pending = service
            .add_comment(&actor(), post.id, "First comment")
            .await
            .unwrap();

        store.delete_behind_reads();
        assert!(matches!(
            service.add_comment(&actor(), post.id, "Too late").await,
            Err(DomainError::NotFound {
                entity_type: "Post",
                ..
            })
        ));
        assert_eq!(store.comment_count(post.id), 0);

        // Restore the post so the approval can load it once more.
        *store.delete_behind_reads.lock().unwrap() = false;
        store.posts.lock().unwrap().push(post.clone());
        store.comments.lock().unwrap().push(pending.clone());
        store.delete_behind_reads();

        assert!(matches!(
            service.approve_comment(&owner, pending.id).await,
            Err(DomainError::NotFound {
                entity_type: "Comment",
                ..
            })
        ));
        assert_eq!(store.comment_count(post.id), 0);
    }
}

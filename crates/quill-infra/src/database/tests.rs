use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::domain::{Comment, Post};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository};

use crate::database::entity::{comment, post};
use crate::database::postgres_repo::{PostgresCommentRepository, PostgresPostRepository};

fn post_model(id: Uuid, owner_id: Uuid, published: bool) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        owner_id,
        title: "Test Post".to_owned(),
        content: "Content long enough".to_owned(),
        published,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn comment_model(post_id: Uuid, approved: bool) -> comment::Model {
    comment::Model {
        id: Uuid::new_v4(),
        post_id,
        author_id: Uuid::new_v4(),
        content: "Nice one".to_owned(),
        approved,
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, owner_id, true)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts: &dyn PostRepository = &repo;

    let post: Post = posts.find_by_id(post_id).await.unwrap().unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.owner_id, owner_id);
    assert!(post.published);
}

#[tokio::test]
async fn test_save_new_post_inserts() {
    let model = post_model(Uuid::new_v4(), Uuid::new_v4(), false);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new(), vec![model.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts: &dyn PostRepository = &repo;

    let saved = posts.save(Post::from(model.clone())).await.unwrap();
    assert_eq!(saved.id, model.id);
    assert_eq!(saved.title, model.title);
}

#[tokio::test]
async fn test_list_comments_for_post() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            comment_model(post_id, true),
            comment_model(post_id, false),
        ]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments: &dyn CommentRepository = &repo;

    let listed: Vec<Comment> = comments.list_for_post(post_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|c| c.post_id == post_id));
    assert!(listed[0].approved);
}

#[tokio::test]
async fn test_delete_cascade_removes_comments_then_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts: &dyn PostRepository = &repo;

    assert!(posts.delete_cascade(Uuid::new_v4()).await.is_ok());
}

#[tokio::test]
async fn test_delete_cascade_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts: &dyn PostRepository = &repo;

    assert!(matches!(
        posts.delete_cascade(Uuid::new_v4()).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_update_existing_post() {
    let model = post_model(Uuid::new_v4(), Uuid::new_v4(), true);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts: &dyn PostRepository = &repo;

    let updated = posts.update(Post::from(model.clone())).await.unwrap();
    assert_eq!(updated.id, model.id);
}

#[tokio::test]
async fn test_update_missing_post_is_not_inserted() {
    let model = post_model(Uuid::new_v4(), Uuid::new_v4(), true);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts: &dyn PostRepository = &repo;

    assert!(matches!(
        posts.update(Post::from(model)).await,
        Err(RepoError::NotFound)
    ));
}

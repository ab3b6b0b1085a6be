//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use uuid::Uuid;

use quill_core::domain::{Comment, Post};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        // The foreign key cascades too; deleting explicitly keeps the
        // operation atomic on schemas created without it.
        let comments = CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(write_error)?;

        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(write_error)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(query_error)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(query_error)?;
        tracing::debug!(post_id = %id, comments = comments.rows_affected, "Post deleted");
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, SqlErr,
};

use quill_core::domain::{Comment, NewComment, NewPost, Post, PostId};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, PostFilter, PostRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL post repository.
///
/// Comments are removed with their post by the `ON DELETE CASCADE` foreign key.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(new_post)
            .insert(self.db.as_ref())
            .await
            .map_err(query_error)?;

        tracing::debug!(post_id = model.id, "Created post");
        Ok(model.into())
    }

    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::PublishedAt.is_not_null())
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find();

        match filter.published {
            Some(true) => query = query.filter(post::Column::PublishedAt.is_not_null()),
            Some(false) => query = query.filter(post::Column::PublishedAt.is_null()),
            None => {}
        }
        if let Some(term) = filter.search.as_deref() {
            query = query.filter(
                Condition::any()
                    .add(post::Column::Title.contains(term))
                    .add(post::Column::Content.contains(term)),
            );
        }

        let result = query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn publish(&self, id: PostId, at: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut draft = BaseRepository::<Post, PostId>::find_by_id(self, id)
            .await?
            .ok_or(RepoError::NotFound)?;
        if draft.is_published() {
            return Ok(draft);
        }
        draft
            .publish(at)
            .map_err(|e| RepoError::Constraint(e.to_string()))?;

        // Only a draft is stamped, so a concurrent publish keeps the first timestamp.
        let result = PostEntity::update_many()
            .col_expr(
                post::Column::PublishedAt,
                Expr::value(DateTimeWithTimeZone::from(at)),
            )
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::PublishedAt.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            tracing::debug!(post_id = id, "Post was published concurrently");
        } else {
            tracing::info!(post_id = id, "Published post");
        }

        BaseRepository::<Post, PostId>::find_by_id(self, id)
            .await?
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let post_id = new_comment.post_id;
        let model = comment::ActiveModel::from(new_comment)
            .insert(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    RepoError::Constraint(format!("post {} does not exist", post_id))
                }
                _ => query_error(e),
            })?;

        tracing::debug!(comment_id = model.id, post_id, "Created comment");
        Ok(model.into())
    }

    async fn find_by_post_id(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

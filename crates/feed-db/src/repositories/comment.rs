//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use feed_core::{Comment, CommentRepository, DomainError, RepoResult, Snowflake};

use crate::mappers::comment_from_model;
use crate::models::CommentModel;

use super::error::{map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        post_id: Snowflake,
        comment_id: Snowflake,
    ) -> RepoResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, post_id, author_id, content, like_count, dislike_count,
                   liked_by, disliked_by, created_at
            FROM comments
            WHERE id = $1 AND post_id = $2
            ",
        )
        .bind(comment_id.into_inner())
        .bind(post_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(comment_from_model).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, post_id, author_id, content, like_count, dislike_count,
                   liked_by, disliked_by, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY like_count DESC, id ASC
            ",
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(comment_from_model).collect()
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id, post_id = %comment.post_id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO comments (id, post_id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.post_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The parent post was deleted between the check and the insert.
            match e.as_database_error() {
                Some(db_err) if db_err.is_foreign_key_violation() => {
                    DomainError::PostNotFound(comment.post_id)
                }
                _ => map_unique_violation(e, || {
                    DomainError::InternalError(format!("duplicate comment id {}", comment.id))
                }),
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, post_id: Snowflake, comment_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND post_id = $2")
            .bind(comment_id.into_inner())
            .bind(post_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(comment_id));
        }
        Ok(())
    }
}

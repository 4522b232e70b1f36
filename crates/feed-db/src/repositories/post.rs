//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use feed_core::{DomainError, FeedQuery, FeedSort, Post, PostRepository, RepoResult, Snowflake};

use crate::mappers::post_from_model;
use crate::models::PostModel;

use super::error::map_db_error;

const POST_COLUMNS: &str =
    "id, author_id, content, like_count, dislike_count, liked_by, disliked_by, created_at";

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Shared listing query. `author_id` narrows to one user's posts.
    async fn fetch_page(
        &self,
        author_id: Option<Snowflake>,
        query: &FeedQuery,
    ) -> RepoResult<Vec<Post>> {
        let limit = query.limit.max(1);
        let author = author_id.map(Snowflake::into_inner);

        let rows = match query.sort {
            FeedSort::New => {
                sqlx::query_as::<_, PostModel>(&format!(
                    r"
                    SELECT {POST_COLUMNS}
                    FROM posts
                    WHERE ($1::BIGINT IS NULL OR author_id = $1)
                      AND ($2::BIGINT IS NULL OR id < $2)
                    ORDER BY id DESC
                    LIMIT $3
                    "
                ))
                .bind(author)
                .bind(query.before.map(Snowflake::into_inner))
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            FeedSort::Top => {
                sqlx::query_as::<_, PostModel>(&format!(
                    r"
                    SELECT {POST_COLUMNS}
                    FROM posts
                    WHERE ($1::BIGINT IS NULL OR author_id = $1)
                    ORDER BY (like_count - dislike_count) DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "
                ))
                .bind(author)
                .bind(limit)
                .bind(query.offset.max(0))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        rows.into_iter().map(post_from_model).collect()
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(post_from_model).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, query: FeedQuery) -> RepoResult<Vec<Post>> {
        self.fetch_page(None, &query).await
    }

    #[instrument(skip(self))]
    async fn find_by_author(&self, author_id: Snowflake, query: FeedQuery) -> RepoResult<Vec<Post>> {
        self.fetch_page(Some(author_id), &query).await
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(post.id.into_inner())
        .bind(post.author_id.into_inner())
        .bind(&post.content)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    /// Comments go with it through `ON DELETE CASCADE`.
    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id));
        }
        Ok(())
    }
}

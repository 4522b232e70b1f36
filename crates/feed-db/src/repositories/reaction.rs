//! PostgreSQL implementation of ReactionRepository
//!
//! A toggle runs as one transaction: the target row is locked with
//! `SELECT ... FOR UPDATE`, the new state is computed by
//! `Reactions::toggle`, and the four reaction columns are written back
//! before commit. Concurrent toggles on the same row queue on the lock, so
//! no press is lost.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument, warn};

use feed_core::{
    DomainError, Reactable, ReactableRef, ReactionIntent, ReactionRepository, RepoResult,
    Snowflake, ToggleOutcome,
};

use crate::mappers::{ids_to_column, reactions_from_row};
use crate::models::ReactionRowModel;

use super::error::{map_db_error, map_toggle_error};

#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn lock_row(
    tx: &mut Transaction<'_, Postgres>,
    target: ReactableRef,
) -> Result<Option<ReactionRowModel>, sqlx::Error> {
    match target {
        ReactableRef::Post { post_id } => {
            sqlx::query_as::<_, ReactionRowModel>(
                r"
                SELECT like_count, dislike_count, liked_by, disliked_by
                FROM posts
                WHERE id = $1
                FOR UPDATE
                ",
            )
            .bind(post_id.into_inner())
            .fetch_optional(&mut **tx)
            .await
        }
        ReactableRef::Comment {
            post_id,
            comment_id,
        } => {
            sqlx::query_as::<_, ReactionRowModel>(
                r"
                SELECT like_count, dislike_count, liked_by, disliked_by
                FROM comments
                WHERE id = $1 AND post_id = $2
                FOR UPDATE
                ",
            )
            .bind(comment_id.into_inner())
            .bind(post_id.into_inner())
            .fetch_optional(&mut **tx)
            .await
        }
    }
}

async fn write_row(
    tx: &mut Transaction<'_, Postgres>,
    target: ReactableRef,
    row: &ReactionRowModel,
) -> Result<(), sqlx::Error> {
    let sql = match target {
        ReactableRef::Post { .. } => {
            r"
            UPDATE posts
            SET like_count = $2, dislike_count = $3, liked_by = $4, disliked_by = $5
            WHERE id = $1
            "
        }
        ReactableRef::Comment { .. } => {
            r"
            UPDATE comments
            SET like_count = $2, dislike_count = $3, liked_by = $4, disliked_by = $5
            WHERE id = $1
            "
        }
    };

    sqlx::query(sql)
        .bind(target.id().into_inner())
        .bind(row.like_count)
        .bind(row.dislike_count)
        .bind(&row.liked_by)
        .bind(&row.disliked_by)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self), fields(target = %target))]
    async fn find(&self, target: ReactableRef) -> RepoResult<Option<Reactable>> {
        let row = match target {
            ReactableRef::Post { post_id } => {
                sqlx::query_as::<_, ReactionRowModel>(
                    "SELECT like_count, dislike_count, liked_by, disliked_by FROM posts WHERE id = $1",
                )
                .bind(post_id.into_inner())
                .fetch_optional(&self.pool)
                .await
            }
            ReactableRef::Comment {
                post_id,
                comment_id,
            } => {
                sqlx::query_as::<_, ReactionRowModel>(
                    r"
                    SELECT like_count, dislike_count, liked_by, disliked_by
                    FROM comments
                    WHERE id = $1 AND post_id = $2
                    ",
                )
                .bind(comment_id.into_inner())
                .bind(post_id.into_inner())
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        row.map(|row| Ok(Reactable::new(target, reactions_from_row(target, row)?)))
            .transpose()
    }

    #[instrument(skip(self), fields(target = %target, user_id = %user_id, intent = %intent))]
    async fn toggle(
        &self,
        target: ReactableRef,
        user_id: Snowflake,
        intent: ReactionIntent,
    ) -> RepoResult<ToggleOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let Some(row) = lock_row(&mut tx, target)
            .await
            .map_err(|e| map_toggle_error(e, target))?
        else {
            return Err(missing_target(target, tx.rollback().await));
        };

        let mut reactions = reactions_from_row(target, row)?;
        let transition = reactions.toggle(user_id, intent);

        let updated = ReactionRowModel {
            like_count: reactions.like_count(),
            dislike_count: reactions.dislike_count(),
            liked_by: ids_to_column(reactions.liked_by()),
            disliked_by: ids_to_column(reactions.disliked_by()),
        };
        write_row(&mut tx, target, &updated)
            .await
            .map_err(|e| map_toggle_error(e, target))?;

        tx.commit().await.map_err(|e| map_toggle_error(e, target))?;

        debug!(
            previous = transition.previous.as_str(),
            current = transition.current.as_str(),
            likes = reactions.like_count(),
            dislikes = reactions.dislike_count(),
            "Reaction toggled"
        );

        Ok(ToggleOutcome {
            reactable: Reactable::new(target, reactions),
            user_id,
            intent,
            transition,
        })
    }
}

/// The target is gone whatever the rollback reports. A failed rollback only
/// loses the connection; the transaction is discarded with it.
fn missing_target(target: ReactableRef, rollback: Result<(), sqlx::Error>) -> DomainError {
    if let Err(e) = rollback {
        warn!(reactable = %target, error = %e, "Rollback after missing reaction target failed");
    }
    DomainError::ReactableNotFound(target)
}

//! Reaction service - the like/dislike toggle
//!
//! The caller identity is an explicit argument. The read-compute-write runs
//! inside the repository as one atomic step; this layer only checks that
//! someone is signed in, then announces the committed snapshot.

use chrono::Utc;
use feed_core::events::ReactionToggledEvent;
use feed_core::{DomainError, DomainEvent, ReactableRef, ReactionIntent, Snowflake};
use tracing::{info, instrument};

use crate::dto::{ReactionSummary, ReactionToggleResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply one like/dislike press for `actor`.
    ///
    /// # Errors
    /// - `Unauthenticated` without an actor; nothing is read or written
    /// - `ReactableNotFound` when the post or comment does not exist
    /// - `ReactionConflict` when the store aborted a concurrent update
    /// - storage errors as reported by the repository
    #[instrument(skip(self), fields(target = %target, intent = %intent))]
    pub async fn toggle(
        &self,
        actor: Option<Snowflake>,
        target: ReactableRef,
        intent: ReactionIntent,
    ) -> ServiceResult<ReactionToggleResponse> {
        let user_id = actor.ok_or(DomainError::Unauthenticated)?;

        let outcome = self
            .ctx
            .reaction_repo()
            .toggle(target, user_id, intent)
            .await?;

        info!(
            user_id = %user_id,
            previous = %outcome.transition.previous,
            current = %outcome.transition.current,
            likes = outcome.reactable.reactions.like_count(),
            dislikes = outcome.reactable.reactions.dislike_count(),
            "Reaction toggled"
        );

        let response = ReactionToggleResponse::from(&outcome);

        self.ctx
            .publish(DomainEvent::ReactionToggled(ReactionToggledEvent {
                snapshot: outcome.reactable,
                user_id,
                intent,
                transition: outcome.transition,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(response)
    }

    /// Current counts of a post or comment, with the viewer's own state
    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        target: ReactableRef,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<ReactionSummary> {
        let reactable = self
            .ctx
            .reaction_repo()
            .find(target)
            .await?
            .ok_or(DomainError::ReactableNotFound(target))?;

        Ok(ReactionSummary::new(&reactable.reactions, viewer))
    }
}

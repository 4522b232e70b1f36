use std::collections::BTreeSet;

use feed_core::{DomainError, ReactableRef, Reactions, Snowflake};

use crate::models::ReactionRowModel;

pub fn reactions_from_row(
    target: ReactableRef,
    row: ReactionRowModel,
) -> Result<Reactions, DomainError> {
    Reactions::from_parts(
        row.like_count,
        row.dislike_count,
        row.liked_by.into_iter().map(Snowflake::new),
        row.disliked_by.into_iter().map(Snowflake::new),
    )
    .map_err(|e| DomainError::CorruptReactions {
        target,
        reason: e.to_string(),
    })
}

pub fn ids_to_column(ids: &BTreeSet<Snowflake>) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}

//! Entity to DTO mappers

use feed_core::{Comment, Post, ProfileStats, Reactions, Snowflake, ToggleOutcome, User};

use super::responses::{
    AuthorResponse, CommentResponse, CurrentUserResponse, PostResponse, ProfileStatsResponse,
    ReactionSummary, ReactionToggleResponse, UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<ProfileStats> for ProfileStatsResponse {
    fn from(stats: ProfileStats) -> Self {
        Self {
            post_count: stats.post_count,
            comment_count: stats.comment_count,
            total_likes: stats.total_likes,
        }
    }
}

impl AuthorResponse {
    pub fn new(id: Snowflake, user: Option<&User>) -> Self {
        Self {
            id: id.to_string(),
            username: user.map(|u| u.username.clone()),
        }
    }
}

// ============================================================================
// Reaction Mappers
// ============================================================================

impl ReactionSummary {
    /// `viewer` is the authenticated caller, if any
    pub fn new(reactions: &Reactions, viewer: Option<Snowflake>) -> Self {
        Self {
            likes: reactions.like_count(),
            dislikes: reactions.dislike_count(),
            score: reactions.net_score(),
            me: viewer.map(|id| reactions.state_of(id)),
        }
    }
}

impl From<&ToggleOutcome> for ReactionToggleResponse {
    fn from(outcome: &ToggleOutcome) -> Self {
        let reactions = &outcome.reactable.reactions;
        Self {
            target: outcome.reactable.target,
            likes: reactions.like_count(),
            dislikes: reactions.dislike_count(),
            score: reactions.net_score(),
            previous: outcome.transition.previous,
            me: outcome.transition.current,
        }
    }
}

// ============================================================================
// Post / Comment Mappers
// ============================================================================

impl PostResponse {
    pub fn new(post: &Post, author: Option<&User>, viewer: Option<Snowflake>) -> Self {
        Self {
            id: post.id.to_string(),
            author: AuthorResponse::new(post.author_id, author),
            content: post.content.clone(),
            created_at: post.created_at,
            reactions: ReactionSummary::new(&post.reactions, viewer),
        }
    }
}

impl CommentResponse {
    pub fn new(comment: &Comment, author: Option<&User>, viewer: Option<Snowflake>) -> Self {
        Self {
            id: comment.id.to_string(),
            post_id: comment.post_id.to_string(),
            author: AuthorResponse::new(comment.author_id, author),
            content: comment.content.clone(),
            created_at: comment.created_at,
            reactions: ReactionSummary::new(&comment.reactions, viewer),
        }
    }
}

//! Domain events - emitted after state changes are committed
//!
//! Observers (SSE streams, caches) consume these through the
//! [`EventPublisher`](crate::traits::EventPublisher) port. They are never
//! part of the write itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Reactable, ReactionTransition};
use crate::value_objects::{ReactionIntent, Snowflake};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // User Events
    // =========================================================================
    UserCreated(UserCreatedEvent),
    UserUpdated(UserUpdatedEvent),

    // =========================================================================
    // Post Events
    // =========================================================================
    PostCreated(PostCreatedEvent),
    PostDeleted(PostDeletedEvent),

    // =========================================================================
    // Comment Events
    // =========================================================================
    CommentCreated(CommentCreatedEvent),
    CommentDeleted(CommentDeletedEvent),

    // =========================================================================
    // Reaction Events
    // =========================================================================
    ReactionToggled(ReactionToggledEvent),
}

impl DomainEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserCreated(_) => "USER_CREATED",
            Self::UserUpdated(_) => "USER_UPDATED",
            Self::PostCreated(_) => "POST_CREATED",
            Self::PostDeleted(_) => "POST_DELETED",
            Self::CommentCreated(_) => "COMMENT_CREATED",
            Self::CommentDeleted(_) => "COMMENT_DELETED",
            Self::ReactionToggled(_) => "REACTION_TOGGLED",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UserCreated(e) => e.timestamp,
            Self::UserUpdated(e) => e.timestamp,
            Self::PostCreated(e) => e.timestamp,
            Self::PostDeleted(e) => e.timestamp,
            Self::CommentCreated(e) => e.timestamp,
            Self::CommentDeleted(e) => e.timestamp,
            Self::ReactionToggled(e) => e.timestamp,
        }
    }

    /// Post whose watchers should see this event, if any
    pub fn post_id(&self) -> Option<Snowflake> {
        match self {
            Self::UserCreated(_) | Self::UserUpdated(_) => None,
            Self::PostCreated(e) => Some(e.post_id),
            Self::PostDeleted(e) => Some(e.post_id),
            Self::CommentCreated(e) => Some(e.post_id),
            Self::CommentDeleted(e) => Some(e.post_id),
            Self::ReactionToggled(e) => Some(e.snapshot.target.post_id()),
        }
    }

    /// Whether the event belongs on the global feed channel
    pub fn is_feed_event(&self) -> bool {
        matches!(
            self,
            Self::PostCreated(_) | Self::PostDeleted(_) | Self::ReactionToggled(_)
        )
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreatedEvent {
    pub user_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdatedEvent {
    pub user_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreatedEvent {
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDeletedEvent {
    pub post_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedEvent {
    pub comment_id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDeletedEvent {
    pub comment_id: Snowflake,
    pub post_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

/// Carries the full post-toggle snapshot so observers can replace their copy
/// instead of replaying deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionToggledEvent {
    pub snapshot: Reactable,
    pub user_id: Snowflake,
    pub intent: ReactionIntent,
    pub transition: ReactionTransition,
    pub timestamp: DateTime<Utc>,
}

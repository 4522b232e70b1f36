//! Response DTOs for API endpoints
//!
//! Snowflake ids serialize as strings for JavaScript clients.

use chrono::{DateTime, Utc};
use feed_core::{ReactableRef, ReactionState};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// One page of a listing
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Default, Serialize)]
pub struct PaginationMeta {
    /// Pass as `before` to fetch the next page of the `new` ordering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_before: Option<String>,
    /// Pass as `offset` to fetch the next page of the `top` ordering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<i64>,
    pub has_more: bool,
    pub limit: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: PaginationMeta) -> Self {
        Self { data, pagination }
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
    pub user: CurrentUserResponse,
}

// ============================================================================
// User Responses
// ============================================================================

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated user, including private fields
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProfileStatsResponse {
    pub post_count: i64,
    pub comment_count: i64,
    /// Likes received across the user's posts and comments
    pub total_likes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub stats: ProfileStatsResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentProfileResponse {
    #[serde(flatten)]
    pub user: CurrentUserResponse,
    pub stats: ProfileStatsResponse,
}

// ============================================================================
// Post / Comment Responses
// ============================================================================

/// Reaction counters as shown next to a post or comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionSummary {
    pub likes: i64,
    pub dislikes: i64,
    /// likes - dislikes
    pub score: i64,
    /// Viewer's own reaction, absent for anonymous viewers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub me: Option<ReactionState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub author: AuthorResponse,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reactions: ReactionSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author: AuthorResponse,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reactions: ReactionSummary,
}

/// Author reference embedded in posts and comments
#[derive(Debug, Clone, Serialize)]
pub struct AuthorResponse {
    pub id: String,
    /// Absent if the account no longer exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Result of one like/dislike press
#[derive(Debug, Clone, Serialize)]
pub struct ReactionToggleResponse {
    pub target: ReactableRef,
    pub likes: i64,
    pub dislikes: i64,
    pub score: i64,
    pub previous: ReactionState,
    pub me: ReactionState,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let label = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if database_healthy && redis_healthy {
                "ready"
            } else {
                "not_ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                redis: label(redis_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs; `feed-db` provides the PostgreSQL
//! implementation and the service crate's tests provide in-memory ones.

use async_trait::async_trait;

use crate::entities::{Comment, Post, ProfileStats, Reactable, ToggleOutcome, User};
use crate::error::DomainError;
use crate::value_objects::{ReactableRef, ReactionIntent, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Lookup by normalized (lowercase) email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Persist username/email changes
    async fn update(&self, user: &User) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Post and comment counts plus likes received
    async fn profile_stats(&self, id: Snowflake) -> RepoResult<ProfileStats>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Feed ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSort {
    /// Newest first; `before` is an id cursor
    #[default]
    New,
    /// Highest net score first, newest first among equals
    Top,
}

/// Pagination options for post listings.
///
/// `New` pages with the `before` id cursor. Scores change under readers, so
/// `Top` pages with a plain `offset` and `before` is ignored.
///
/// `limit` arrives already bounded by the configured page size. Stores
/// return up to that many rows.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub before: Option<Snowflake>,
    pub offset: i64,
    pub limit: i64,
    pub sort: FeedSort,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    async fn list(&self, query: FeedQuery) -> RepoResult<Vec<Post>>;

    async fn find_by_author(&self, author_id: Snowflake, query: FeedQuery)
        -> RepoResult<Vec<Post>>;

    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Delete a post together with its comments
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, post_id: Snowflake, comment_id: Snowflake)
        -> RepoResult<Option<Comment>>;

    /// Comments of a post, most liked first then oldest first
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<Comment>>;

    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    async fn delete(&self, post_id: Snowflake, comment_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Current reaction state of a post or comment
    async fn find(&self, target: ReactableRef) -> RepoResult<Option<Reactable>>;

    /// Apply one like/dislike press atomically.
    ///
    /// Implementations must read, compute (with `Reactions::toggle`) and
    /// write as one indivisible step with respect to other toggles on the
    /// same target. A missing target yields `ReactableNotFound` and writes
    /// nothing. A store-reported serialization failure yields
    /// `ReactionConflict`. Implementations do not retry.
    async fn toggle(
        &self,
        target: ReactableRef,
        user_id: Snowflake,
        intent: ReactionIntent,
    ) -> RepoResult<ToggleOutcome>;
}

//! Non-persistence ports: refresh sessions and event fan-out

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repositories::RepoResult;
use crate::events::DomainEvent;
use crate::value_objects::Snowflake;

/// What is remembered about an issued refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    pub user_id: Snowflake,
    pub session_id: String,
    /// Unix seconds
    pub created_at: i64,
    /// Long-lived session ("remember me") or one that ends within a day
    pub remember_me: bool,
}

impl RefreshSession {
    pub fn new(user_id: Snowflake, session_id: String, remember_me: bool) -> Self {
        Self {
            user_id,
            session_id,
            created_at: chrono::Utc::now().timestamp(),
            remember_me,
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn store(&self, token: &str, session: &RefreshSession, ttl_seconds: u64)
        -> RepoResult<()>;

    /// `None` when the token is unknown, revoked or expired
    async fn find(&self, token: &str) -> RepoResult<Option<RefreshSession>>;

    async fn revoke(&self, token: &str) -> RepoResult<bool>;

    /// Sign out everywhere; returns the number of sessions removed
    async fn revoke_all(&self, user_id: Snowflake) -> RepoResult<u32>;
}

/// Publishes committed changes to passive observers.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()>;
}

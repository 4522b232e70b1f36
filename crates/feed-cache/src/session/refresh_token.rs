//! Refresh sessions in Redis.
//!
//! Each token lives under `refresh_token:{token}` with the session's TTL.
//! A `user_sessions:{user_id}` set tracks a user's tokens so they can all be
//! revoked at once.

use async_trait::async_trait;
use feed_core::{RefreshSession, RepoResult, SessionStore, Snowflake};
use redis::AsyncCommands;
use tracing::{debug, info, instrument};

use crate::pool::{RedisPool, RedisResult};

const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";
const USER_SESSIONS_PREFIX: &str = "user_sessions:";

#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: RedisPool,
}

impl RefreshTokenStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(token: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_SESSIONS_PREFIX}{user_id}")
    }

    #[instrument(skip(self, token, session), fields(user_id = %session.user_id))]
    async fn store_session(
        &self,
        token: &str,
        session: &RefreshSession,
        ttl_seconds: u64,
    ) -> RedisResult<()> {
        let payload = serde_json::to_string(session)?;
        let user_key = Self::user_key(session.user_id);
        let mut conn = self.pool.get().await?;

        conn.set_ex::<_, _, ()>(Self::key(token), payload, ttl_seconds)
            .await?;

        // Index lives as long as its longest-lived token
        conn.sadd::<_, _, ()>(&user_key, token).await?;
        let current_ttl: i64 = conn.ttl(&user_key).await?;
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        if current_ttl < ttl {
            conn.expire::<_, ()>(&user_key, ttl).await?;
        }

        debug!(
            session_id = %session.session_id,
            remember_me = session.remember_me,
            ttl_seconds,
            "Stored refresh session"
        );
        Ok(())
    }

    #[instrument(skip_all)]
    async fn revoke_token(&self, token: &str) -> RedisResult<bool> {
        let session = self.pool.get_json::<RefreshSession>(&Self::key(token)).await?;
        let mut conn = self.pool.get().await?;

        if let Some(session) = session {
            conn.srem::<_, _, ()>(Self::user_key(session.user_id), token)
                .await?;
        }

        let deleted: u32 = conn.del(Self::key(token)).await?;
        if deleted > 0 {
            debug!("Revoked refresh session");
        }
        Ok(deleted > 0)
    }

    #[instrument(skip(self))]
    async fn revoke_user(&self, user_id: Snowflake) -> RedisResult<u32> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;

        let tokens: Vec<String> = conn.smembers(&user_key).await?;
        let mut removed = 0;
        if !tokens.is_empty() {
            let keys: Vec<String> = tokens.iter().map(|t| Self::key(t)).collect();
            removed = conn.del(&keys).await?;
        }
        conn.del::<_, ()>(&user_key).await?;

        info!(count = removed, "Revoked all refresh sessions for user");
        Ok(removed)
    }
}

#[async_trait]
impl SessionStore for RefreshTokenStore {
    async fn store(
        &self,
        token: &str,
        session: &RefreshSession,
        ttl_seconds: u64,
    ) -> RepoResult<()> {
        Ok(self.store_session(token, session, ttl_seconds).await?)
    }

    async fn find(&self, token: &str) -> RepoResult<Option<RefreshSession>> {
        Ok(self.pool.get_json(&Self::key(token)).await?)
    }

    async fn revoke(&self, token: &str) -> RepoResult<bool> {
        Ok(self.revoke_token(token).await?)
    }

    async fn revoke_all(&self, user_id: Snowflake) -> RepoResult<u32> {
        Ok(self.revoke_user(user_id).await?)
    }
}

//! deadpool-redis pool shared by the session store and the publisher

use deadpool_redis::{Config, Connection, Pool, Runtime};
use feed_common::RedisConfig;
use feed_core::DomainError;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Invalid Redis pool settings: {0}")]
    Build(String),

    #[error("No Redis connection available: {0}")]
    Checkout(#[from] deadpool_redis::PoolError),

    #[error("Redis command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("Malformed cached value: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

impl From<RedisPoolError> for DomainError {
    fn from(err: RedisPoolError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}

/// Cheap to clone; every clone checks out of the same pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
    url: String,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish_non_exhaustive()
    }
}

impl RedisPool {
    /// Connections are opened lazily, so this succeeds without a reachable server
    pub fn from_config(config: &RedisConfig) -> RedisResult<Self> {
        let max_size = usize::try_from(config.max_connections)
            .map_err(|e| RedisPoolError::Build(e.to_string()))?;

        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| RedisPoolError::Build(e.to_string()))?
            .max_size(max_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::Build(e.to_string()))?;

        tracing::info!(
            host = %redacted(&config.url),
            max_connections = max_size,
            "Redis pool created"
        );

        Ok(Self {
            pool,
            url: config.url.clone(),
        })
    }

    pub async fn get(&self) -> RedisResult<Connection> {
        Ok(self.pool.get().await?)
    }

    /// Pub/sub cannot share pooled connections, the subscriber dials this itself
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }

    /// Read a JSON value stored under `key`
    pub async fn get_json<V: DeserializeOwned>(&self, key: &str) -> RedisResult<Option<V>> {
        let mut conn = self.get().await?;
        let raw: Option<String> = conn.get(key).await?;
        Ok(raw.as_deref().map(serde_json::from_str).transpose()?)
    }
}

/// Host part of a Redis URL, without user or password
fn redacted(url: &str) -> &str {
    url.rsplit_once('@').map_or(url, |(_, host)| host)
}

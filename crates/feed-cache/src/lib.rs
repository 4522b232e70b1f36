//! # feed-cache
//!
//! Redis layer for refresh sessions and live event fan-out.
//!
//! - **Connection Pool**: deadpool-managed Redis connections
//! - **Sessions**: refresh tokens with per-user revocation
//! - **Pub/Sub**: `feed` and `post:{id}` channels carrying domain events
//!
//! ```ignore
//! use feed_cache::{Publisher, RedisPool, Subscriber, SubscriberConfig};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let publisher = Publisher::new(pool.clone());
//! let subscriber = Subscriber::spawn(SubscriberConfig {
//!     redis_url: pool.url().to_string(),
//!     ..SubscriberConfig::default()
//! });
//! ```

pub mod pool;
pub mod pubsub;
pub mod session;

pub use pool::{RedisPool, RedisPoolError, RedisResult};
pub use pubsub::{
    FeedChannel, Publisher, ReceivedEvent, Subscriber, SubscriberConfig, SubscriberError,
    SubscriberResult, FEED_CHANNEL, POST_CHANNEL_PATTERN, POST_CHANNEL_PREFIX,
};
pub use session::RefreshTokenStore;

//! Redis Pub/Sub publisher for domain events.

use async_trait::async_trait;
use feed_core::{DomainEvent, EventPublisher, RepoResult};
use redis::AsyncCommands;

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::FeedChannel;

#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish one event to every channel it routes to. Returns how many
    /// subscribers received it in total.
    #[tracing::instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn publish_event(&self, event: &DomainEvent) -> RedisResult<u32> {
        let channels = FeedChannel::for_event(event);
        if channels.is_empty() {
            return Ok(0);
        }

        let payload = serde_json::to_string(event)?;
        let mut conn = self.pool.get().await?;
        let mut total_receivers = 0;

        for channel in &channels {
            let receivers: u32 = conn.publish(channel.name(), &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            event_type = event.event_type(),
            channels = channels.len(),
            receivers = total_receivers,
            "Published event"
        );

        Ok(total_receivers)
    }
}

#[async_trait]
impl EventPublisher for Publisher {
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()> {
        self.publish_event(event).await?;
        Ok(())
    }
}

//! Redis Pub/Sub subscriber.
//!
//! One subscriber per process listens on the feed channel and on every post
//! channel, then rebroadcasts decoded events in-process. Each live stream
//! takes a [`broadcast::Receiver`] and keeps only the channel it watches.

use std::sync::Arc;

use feed_core::DomainEvent;
use futures_util::StreamExt;
use redis::Client;
use tokio::sync::{broadcast, mpsc};

use crate::pubsub::{FeedChannel, FEED_CHANNEL, POST_CHANNEL_PATTERN};

#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Channel closed")]
    ChannelClosed,
}

pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// A decoded event and the channel it arrived on
#[derive(Debug, Clone)]
pub struct ReceivedEvent {
    pub channel: FeedChannel,
    pub event: Arc<DomainEvent>,
}

impl ReceivedEvent {
    /// `None` for foreign channels or payloads that are not domain events
    fn decode(channel_name: &str, payload: &str) -> Option<Self> {
        let channel = FeedChannel::parse(channel_name)?;
        match serde_json::from_str::<DomainEvent>(payload) {
            Ok(event) => Some(Self {
                channel,
                event: Arc::new(event),
            }),
            Err(e) => {
                tracing::warn!(channel = %channel_name, error = %e, "Dropping undecodable event");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub redis_url: String,
    /// Events buffered per slow receiver before it starts lagging
    pub broadcast_buffer: usize,
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

pub struct Subscriber {
    broadcast_tx: broadcast::Sender<ReceivedEvent>,
    shutdown_tx: mpsc::Sender<()>,
}

impl Subscriber {
    /// Start the background listener. Connection failures are retried in
    /// the background, so this never fails on an unreachable Redis.
    #[must_use]
    pub fn spawn(config: SubscriberConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(Self::listener_loop(config, broadcast_tx.clone(), shutdown_rx));

        Self {
            broadcast_tx,
            shutdown_tx,
        }
    }

    async fn listener_loop(
        config: SubscriberConfig,
        broadcast_tx: broadcast::Sender<ReceivedEvent>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        loop {
            match Self::run_listener(&config, &broadcast_tx, &mut shutdown_rx).await {
                Ok(true) => {
                    tracing::info!("Subscriber shutting down");
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Subscriber error, reconnecting...");
                }
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(config.reconnect_delay_ms))
                .await;
        }
    }

    /// Returns `Ok(true)` on shutdown, `Ok(false)` when the stream ended
    async fn run_listener(
        config: &SubscriberConfig,
        broadcast_tx: &broadcast::Sender<ReceivedEvent>,
        shutdown_rx: &mut mpsc::Receiver<()>,
    ) -> SubscriberResult<bool> {
        let client = Client::open(config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;
        pubsub.subscribe(FEED_CHANNEL).await?;
        pubsub.psubscribe(POST_CHANNEL_PATTERN).await?;

        tracing::info!("Subscriber connected to Redis");

        let mut stream = pubsub.on_message();

        loop {
            tokio::select! {
                msg = stream.next() => {
                    let Some(msg) = msg else {
                        tracing::warn!("Pub/Sub stream ended");
                        return Ok(false);
                    };
                    let channel_name = msg.get_channel_name().to_string();
                    let payload: String = msg.get_payload().unwrap_or_default();

                    if let Some(received) = ReceivedEvent::decode(&channel_name, &payload) {
                        // No receivers is fine
                        let _ = broadcast_tx.send(received);
                    }
                    tracing::trace!(channel = %channel_name, "Received Pub/Sub message");
                }
                _ = shutdown_rx.recv() => {
                    return Ok(true);
                }
            }
        }
    }

    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Number of live receivers
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.broadcast_tx.receiver_count()
    }

    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }
}

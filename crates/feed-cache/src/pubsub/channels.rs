//! Pub/Sub channel naming.

use feed_core::{DomainEvent, Snowflake};

/// Global feed channel
pub const FEED_CHANNEL: &str = "feed";
/// Prefix of per-post channels
pub const POST_CHANNEL_PREFIX: &str = "post:";
/// Pattern matching every per-post channel
pub const POST_CHANNEL_PATTERN: &str = "post:*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedChannel {
    /// New posts, deletions and score changes across the whole feed
    Feed,
    /// Everything happening under one post
    Post(Snowflake),
}

impl FeedChannel {
    #[must_use]
    pub fn post(post_id: Snowflake) -> Self {
        Self::Post(post_id)
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Feed => FEED_CHANNEL.to_string(),
            Self::Post(id) => format!("{POST_CHANNEL_PREFIX}{id}"),
        }
    }

    /// `None` for channels this service does not own
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name == FEED_CHANNEL {
            return Some(Self::Feed);
        }
        name.strip_prefix(POST_CHANNEL_PREFIX)
            .and_then(|id| Snowflake::parse(id).ok())
            .map(Self::Post)
    }

    /// Channels an event is delivered on
    #[must_use]
    pub fn for_event(event: &DomainEvent) -> Vec<Self> {
        let mut channels = Vec::with_capacity(2);
        if let Some(post_id) = event.post_id() {
            channels.push(Self::Post(post_id));
        }
        if event.is_feed_event() {
            channels.push(Self::Feed);
        }
        channels
    }
}

impl std::fmt::Display for FeedChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

//! Redis Pub/Sub fan-out of domain events

mod channels;
mod publisher;
mod subscriber;

pub use channels::{FeedChannel, FEED_CHANNEL, POST_CHANNEL_PATTERN, POST_CHANNEL_PREFIX};
pub use publisher::Publisher;
pub use subscriber::{
    ReceivedEvent, Subscriber, SubscriberConfig, SubscriberError, SubscriberResult,
};

//! # feed-core
//!
//! Domain layer: users, posts, comments and the like/dislike toggle that
//! every post and comment carries, plus the ports the outer layers implement.
//! No infrastructure dependencies.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

pub use entities::{
    normalize_email, sort_for_thread, validate_content, Comment, Post, ProfileStats, Reactable,
    ReactionInvariantError, ReactionTransition, Reactions, ToggleOutcome, User,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    CommentRepository, EventPublisher, FeedQuery, FeedSort, PostRepository, ReactionRepository,
    RefreshSession, RepoResult, SessionStore, UserRepository,
};
pub use value_objects::{
    ReactableKind, ReactableRef, ReactionIntent, ReactionState, Snowflake, SnowflakeGenerator,
    SnowflakeParseError,
};

//! Value objects - immutable types that represent domain concepts

mod reaction;
mod snowflake;

pub use reaction::{ReactableKind, ReactableRef, ReactionIntent, ReactionState, UnknownReaction};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};

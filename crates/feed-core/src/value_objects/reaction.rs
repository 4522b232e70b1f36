//! Reaction vocabulary: what a user asked for, where they stand, and what
//! they reacted to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Snowflake;

/// The button the user pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionIntent {
    Like,
    Dislike,
}

impl ReactionIntent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// The intent on the other side of the mirror
    pub const fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }

    /// State a user lands in when this intent adds their vote
    pub const fn target_state(self) -> ReactionState {
        match self {
            Self::Like => ReactionState::Liked,
            Self::Dislike => ReactionState::Disliked,
        }
    }
}

impl fmt::Display for ReactionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reaction '{0}', expected 'like' or 'dislike'")]
pub struct UnknownReaction(pub String);

impl FromStr for ReactionIntent {
    type Err = UnknownReaction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            _ => Err(UnknownReaction(s.to_string())),
        }
    }
}

/// Where one user stands on one reactable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionState {
    #[default]
    None,
    Liked,
    Disliked,
}

impl ReactionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Liked => "liked",
            Self::Disliked => "disliked",
        }
    }

    /// The per-user state machine.
    ///
    /// | state    | like     | dislike  |
    /// |----------|----------|----------|
    /// | none     | liked    | disliked |
    /// | liked    | none     | disliked |
    /// | disliked | liked    | none     |
    pub const fn next(self, intent: ReactionIntent) -> Self {
        match (self, intent) {
            (Self::Liked, ReactionIntent::Like) | (Self::Disliked, ReactionIntent::Dislike) => {
                Self::None
            }
            (_, intent) => intent.target_state(),
        }
    }
}

impl fmt::Display for ReactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of document carrying reactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactableKind {
    Post,
    Comment,
}

impl ReactableKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

/// Address of a reactable. Comments live under a post, so their address
/// carries the parent id as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReactableRef {
    Post { post_id: Snowflake },
    Comment { post_id: Snowflake, comment_id: Snowflake },
}

impl ReactableRef {
    pub const fn post(post_id: Snowflake) -> Self {
        Self::Post { post_id }
    }

    pub const fn comment(post_id: Snowflake, comment_id: Snowflake) -> Self {
        Self::Comment {
            post_id,
            comment_id,
        }
    }

    pub const fn kind(&self) -> ReactableKind {
        match self {
            Self::Post { .. } => ReactableKind::Post,
            Self::Comment { .. } => ReactableKind::Comment,
        }
    }

    /// Id of the reactable document itself
    pub const fn id(&self) -> Snowflake {
        match self {
            Self::Post { post_id } => *post_id,
            Self::Comment { comment_id, .. } => *comment_id,
        }
    }

    /// Post the reactable belongs to (itself for posts)
    pub const fn post_id(&self) -> Snowflake {
        match self {
            Self::Post { post_id } | Self::Comment { post_id, .. } => *post_id,
        }
    }
}

impl fmt::Display for ReactableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post { post_id } => write!(f, "post {post_id}"),
            Self::Comment {
                post_id,
                comment_id,
            } => write!(f, "comment {comment_id} on post {post_id}"),
        }
    }
}

//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ReactableRef, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Reactable not found: {0}")]
    ReactableNotFound(ReactableRef),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authentication / Authorization Errors
    // =========================================================================
    #[error("You must be logged in to do that")]
    Unauthenticated,

    #[error("Not post author")]
    NotPostAuthor,

    #[error("Not comment author")]
    NotCommentAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Concurrent update on {0}, try again")]
    ReactionConflict(ReactableRef),

    // =========================================================================
    // Integrity Errors
    // =========================================================================
    #[error("Reaction state of {target} is inconsistent: {reason}")]
    CorruptReactions { target: ReactableRef, reason: String },

    // =========================================================================
    // Infrastructure Errors
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::ReactableNotFound(_) => "UNKNOWN_REACTABLE",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::NotPostAuthor => "NOT_POST_AUTHOR",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",

            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::ReactionConflict(_) => "REACTION_CONFLICT",

            Self::CorruptReactions { .. } => "CORRUPT_REACTIONS",

            Self::DatabaseError(_) | Self::CacheError(_) => "STORAGE_UNAVAILABLE",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::PostNotFound(_)
                | Self::CommentNotFound(_)
                | Self::ReactableNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
        )
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotPostAuthor | Self::NotCommentAuthor)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::ReactionConflict(_))
    }

    /// Store was unreachable or failed mid-operation; the caller may retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::CacheError(_))
    }
}

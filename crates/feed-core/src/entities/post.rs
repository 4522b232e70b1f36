//! Post entity - a top-level entry in the feed

use chrono::{DateTime, Utc};

use super::reactions::{Reactable, Reactions};
use crate::error::DomainError;
use crate::value_objects::{ReactableRef, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub reactions: Reactions,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// New post with no reactions
    pub fn new(id: Snowflake, author_id: Snowflake, content: String) -> Self {
        Self {
            id,
            author_id,
            content,
            reactions: Reactions::new(),
            created_at: Utc::now(),
        }
    }

    pub fn target(&self) -> ReactableRef {
        ReactableRef::post(self.id)
    }

    pub fn reactable(&self) -> Reactable {
        Reactable::new(self.target(), self.reactions.clone())
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }
}

/// Trim user-supplied text and enforce the length limit, counted in
/// characters rather than bytes.
pub fn validate_content(content: &str, max_chars: usize) -> Result<String, DomainError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyContent);
    }
    if trimmed.chars().count() > max_chars {
        return Err(DomainError::ContentTooLong { max: max_chars });
    }
    Ok(trimmed.to_string())
}

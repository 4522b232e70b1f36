//! Comment entity - a reply attached to a post

use chrono::{DateTime, Utc};

use super::reactions::{Reactable, Reactions};
use crate::value_objects::{ReactableRef, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub reactions: Reactions,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: Snowflake, post_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        Self {
            id,
            post_id,
            author_id,
            content,
            reactions: Reactions::new(),
            created_at: Utc::now(),
        }
    }

    pub fn target(&self) -> ReactableRef {
        ReactableRef::comment(self.post_id, self.id)
    }

    pub fn reactable(&self) -> Reactable {
        Reactable::new(self.target(), self.reactions.clone())
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }
}

/// Order comments the way a thread displays them: most liked first, then
/// oldest first among equals.
pub fn sort_for_thread(comments: &mut [Comment]) {
    comments.sort_by(|a, b| {
        b.reactions
            .like_count()
            .cmp(&a.reactions.like_count())
            .then_with(|| a.id.cmp(&b.id))
    });
}

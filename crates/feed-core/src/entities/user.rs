//! User entity - an account that can post, comment and react

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email: normalize_email(&email),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_username(&mut self, username: String) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = normalize_email(email);
        self.updated_at = Utc::now();
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Activity totals shown on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileStats {
    pub post_count: i64,
    pub comment_count: i64,
    /// Likes received across the user's posts and comments
    pub total_likes: i64,
}

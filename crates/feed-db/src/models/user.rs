use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `users` table, minus the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct ProfileStatsModel {
    pub post_count: i64,
    pub comment_count: i64,
    pub total_likes: i64,
}

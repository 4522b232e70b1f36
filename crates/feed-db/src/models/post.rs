use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub like_count: i64,
    pub dislike_count: i64,
    pub liked_by: Vec<i64>,
    pub disliked_by: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub like_count: i64,
    pub dislike_count: i64,
    pub liked_by: Vec<i64>,
    pub disliked_by: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

/// The four reaction columns shared by `posts` and `comments`
#[derive(Debug, Clone, FromRow)]
pub struct ReactionRowModel {
    pub like_count: i64,
    pub dislike_count: i64,
    pub liked_by: Vec<i64>,
    pub disliked_by: Vec<i64>,
}

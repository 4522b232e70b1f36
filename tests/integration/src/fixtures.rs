//! Request bodies and response shapes as a client sees them

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Suffix that stays unique across tests and runs sharing one database
pub fn unique_suffix() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}{n}", std::process::id())
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("user{suffix}"),
            email: format!("user{suffix}@example.com"),
            password: "feedpass123".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct ContentRequest {
    pub content: String,
}

impl ContentRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: CurrentUserResponse,
}

#[derive(Debug, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub stats: ProfileStats,
}

#[derive(Debug, Deserialize)]
pub struct ProfileStats {
    pub post_count: i64,
    pub comment_count: i64,
    pub total_likes: i64,
}

#[derive(Debug, Deserialize)]
pub struct AuthorResponse {
    pub id: String,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReactionSummary {
    pub likes: i64,
    pub dislikes: i64,
    pub score: i64,
    pub me: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author: AuthorResponse,
    pub content: String,
    pub reactions: ReactionSummary,
}

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author: AuthorResponse,
    pub content: String,
    pub reactions: ReactionSummary,
}

#[derive(Debug, Deserialize)]
pub struct ReactionToggleResponse {
    pub likes: i64,
    pub dislikes: i64,
    pub score: i64,
    pub previous: String,
    pub me: String,
}

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
pub struct PaginationMeta {
    pub next_before: Option<String>,
    pub next_offset: Option<i64>,
    pub has_more: bool,
    pub limit: i64,
}

//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate`. Content length
//! limits come from configuration and are checked by the services.

use feed_common::FeedConfig;
use feed_core::{FeedQuery, FeedSort, Snowflake};
use serde::Deserialize;
use validator::Validate;

use crate::services::{ServiceError, ServiceResult};

// ============================================================================
// Auth Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, stored as the username
    #[serde(alias = "username")]
    #[validate(length(min = 2, max = 32, message = "Name must be 2-32 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Keep the session for the full refresh lifetime instead of one day
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Without a token every session of the user is ended
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// User Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

// ============================================================================
// Post / Comment Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}

// ============================================================================
// Listing Requests
// ============================================================================

/// Query string of post listings: `?sort=new|top&before=<id>&offset=&limit=`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeedPageRequest {
    pub sort: Option<String>,
    pub before: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl FeedPageRequest {
    /// Resolve into a repository query with the page size clamped
    pub fn to_query(&self, config: &FeedConfig) -> ServiceResult<FeedQuery> {
        let sort = match self.sort.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("new") => FeedSort::New,
            Some("top") => FeedSort::Top,
            Some(other) => {
                return Err(ServiceError::validation(format!(
                    "Unknown sort '{other}', expected 'new' or 'top'"
                )))
            }
        };

        let before = self
            .before
            .as_deref()
            .map(Snowflake::parse)
            .transpose()
            .map_err(|_| ServiceError::validation("Invalid 'before' cursor"))?;

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ServiceError::validation("Offset must not be negative"));
        }

        Ok(FeedQuery {
            before,
            offset,
            limit: config.page_size(self.limit),
            sort,
        })
    }
}

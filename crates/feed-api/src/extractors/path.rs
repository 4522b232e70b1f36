//! Path parameter types
//!
//! Ids travel as strings in URLs; each accessor parses and reports the
//! offending parameter by name.

use feed_core::{ReactableRef, ReactionIntent, Snowflake};
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

fn parse_intent(raw: &str) -> Result<ReactionIntent, ApiError> {
    raw.parse::<ReactionIntent>()
        .map_err(|e| ApiError::invalid_path(e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UserPath {
    pub user_id: String,
}

impl UserPath {
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct PostPath {
    pub post_id: String,
}

impl PostPath {
    pub fn post_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.post_id, "post_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub post_id: String,
    pub comment_id: String,
}

impl CommentPath {
    pub fn ids(&self) -> Result<(Snowflake, Snowflake), ApiError> {
        Ok((
            parse_id(&self.post_id, "post_id")?,
            parse_id(&self.comment_id, "comment_id")?,
        ))
    }
}

/// `/posts/:post_id/reactions/:reaction`
#[derive(Debug, Deserialize)]
pub struct PostReactionPath {
    pub post_id: String,
    pub reaction: String,
}

impl PostReactionPath {
    pub fn resolve(&self) -> Result<(ReactableRef, ReactionIntent), ApiError> {
        let post_id = parse_id(&self.post_id, "post_id")?;
        Ok((ReactableRef::post(post_id), parse_intent(&self.reaction)?))
    }
}

/// `/posts/:post_id/comments/:comment_id/reactions/:reaction`
#[derive(Debug, Deserialize)]
pub struct CommentReactionPath {
    pub post_id: String,
    pub comment_id: String,
    pub reaction: String,
}

impl CommentReactionPath {
    pub fn resolve(&self) -> Result<(ReactableRef, ReactionIntent), ApiError> {
        let post_id = parse_id(&self.post_id, "post_id")?;
        let comment_id = parse_id(&self.comment_id, "comment_id")?;
        Ok((
            ReactableRef::comment(post_id, comment_id),
            parse_intent(&self.reaction)?,
        ))
    }
}

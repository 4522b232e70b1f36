//! Reaction handlers
//!
//! `PUT` is used because pressing the same button twice is a defined
//! transition (the retraction), and the response always carries the full
//! resulting snapshot.

use axum::{
    extract::{Path, State},
    Json,
};
use feed_core::ReactableRef;
use feed_service::dto::{ReactionSummary, ReactionToggleResponse};
use feed_service::ReactionService;

use crate::extractors::{
    CommentPath, CommentReactionPath, OptionalAuthUser, PostPath, PostReactionPath,
};
use crate::response::ApiResult;
use crate::state::AppState;

/// PUT /posts/{post_id}/reactions/{like|dislike}
pub async fn toggle_post_reaction(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PostReactionPath>,
) -> ApiResult<Json<ReactionToggleResponse>> {
    let (target, intent) = path.resolve()?;
    let service = ReactionService::new(state.service_context());
    let response = service.toggle(auth.user_id(), target, intent).await?;
    Ok(Json(response))
}

/// PUT /posts/{post_id}/comments/{comment_id}/reactions/{like|dislike}
pub async fn toggle_comment_reaction(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<CommentReactionPath>,
) -> ApiResult<Json<ReactionToggleResponse>> {
    let (target, intent) = path.resolve()?;
    let service = ReactionService::new(state.service_context());
    let response = service.toggle(auth.user_id(), target, intent).await?;
    Ok(Json(response))
}

/// GET /posts/{post_id}/reactions
pub async fn get_post_reactions(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<PostPath>,
) -> ApiResult<Json<ReactionSummary>> {
    let target = ReactableRef::post(path.post_id()?);
    let service = ReactionService::new(state.service_context());
    Ok(Json(service.summary(target, viewer.user_id()).await?))
}

/// GET /posts/{post_id}/comments/{comment_id}/reactions
pub async fn get_comment_reactions(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<CommentPath>,
) -> ApiResult<Json<ReactionSummary>> {
    let (post_id, comment_id) = path.ids()?;
    let target = ReactableRef::comment(post_id, comment_id);
    let service = ReactionService::new(state.service_context());
    Ok(Json(service.summary(target, viewer.user_id()).await?))
}

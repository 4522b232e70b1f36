//! Comment handlers

use axum::{
    extract::{Path, State},
    Json,
};
use feed_service::dto::{CommentResponse, CreateCommentRequest};
use feed_service::CommentService;

use crate::extractors::{CommentPath, OptionalAuthUser, PostPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /posts/{post_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PostPath>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service
        .create_comment(auth.user_id(), path.post_id()?, request)
        .await?;
    Ok(Created(Json(response)))
}

/// GET /posts/{post_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<PostPath>,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service
        .list_comments(path.post_id()?, viewer.user_id())
        .await?;
    Ok(Json(response))
}

/// DELETE /posts/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<CommentPath>,
) -> ApiResult<NoContent> {
    let (post_id, comment_id) = path.ids()?;
    let service = CommentService::new(state.service_context());
    service
        .delete_comment(auth.user_id(), post_id, comment_id)
        .await?;
    Ok(NoContent)
}

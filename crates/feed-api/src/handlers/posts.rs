//! Post handlers

use axum::{
    extract::{Path, State},
    Json,
};
use feed_service::dto::{CreatePostRequest, PaginatedResponse, PostResponse};
use feed_service::PostService;

use crate::extractors::{FeedPage, OptionalAuthUser, PostPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service.create_post(auth.user_id(), request).await?;
    Ok(Created(Json(response)))
}

/// GET /posts?sort=new|top&before=&offset=&limit=
pub async fn list_posts(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    FeedPage(page): FeedPage,
) -> ApiResult<Json<PaginatedResponse<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service.list_posts(&page, viewer.user_id()).await?;
    Ok(Json(response))
}

/// GET /posts/{post_id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<PostPath>,
) -> ApiResult<Json<PostResponse>> {
    let service = PostService::new(state.service_context());
    let response = service.get_post(path.post_id()?, viewer.user_id()).await?;
    Ok(Json(response))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PostPath>,
) -> ApiResult<NoContent> {
    let service = PostService::new(state.service_context());
    service.delete_post(auth.user_id(), path.post_id()?).await?;
    Ok(NoContent)
}

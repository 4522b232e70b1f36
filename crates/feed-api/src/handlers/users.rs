//! User handlers

use axum::{
    extract::{Path, State},
    Json,
};
use feed_service::dto::{
    CurrentProfileResponse, CurrentUserResponse, PaginatedResponse, PostResponse,
    ProfileResponse, UpdateUserRequest,
};
use feed_service::UserService;

use crate::extractors::{AuthUser, FeedPage, OptionalAuthUser, UserPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentProfileResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_current_user(auth.user_id).await?;
    Ok(Json(response))
}

/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_user(auth.user_id, request).await?;
    Ok(Json(response))
}

/// GET /users/@me/posts
pub async fn get_current_user_posts(
    State(state): State<AppState>,
    auth: AuthUser,
    FeedPage(page): FeedPage,
) -> ApiResult<Json<PaginatedResponse<PostResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service
        .list_user_posts(auth.user_id, &page, Some(auth.user_id))
        .await?;
    Ok(Json(response))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(path): Path<UserPath>,
) -> ApiResult<Json<ProfileResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_user(path.user_id()?).await?;
    Ok(Json(response))
}

/// GET /users/{user_id}/posts
pub async fn get_user_posts(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<UserPath>,
    FeedPage(page): FeedPage,
) -> ApiResult<Json<PaginatedResponse<PostResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service
        .list_user_posts(path.user_id()?, &page, viewer.user_id())
        .await?;
    Ok(Json(response))
}

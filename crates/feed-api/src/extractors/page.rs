//! Feed paging query parameters

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use feed_service::dto::FeedPageRequest;

use crate::response::ApiError;

/// `?sort=new|top&before=<id>&offset=<n>&limit=<n>`; values are checked by
/// the post service against the configured page sizes.
#[derive(Debug, Clone, Default)]
pub struct FeedPage(pub FeedPageRequest);

#[async_trait]
impl<S> FromRequestParts<S> for FeedPage
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(request) = Query::<FeedPageRequest>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;
        Ok(FeedPage(request))
    }
}

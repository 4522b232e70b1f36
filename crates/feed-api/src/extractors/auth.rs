//! Authentication extractors
//!
//! Resolve the `Authorization: Bearer` access token into a user id.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use feed_core::Snowflake;

use crate::response::ApiError;
use crate::state::AppState;

/// Caller that presented a valid access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Snowflake,
}

impl AuthUser {
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }
}

fn resolve(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = state
        .jwt_service()
        .validate_access_token(token)
        .map_err(|e| {
            tracing::warn!(error = %e, "Invalid access token");
            ApiError::InvalidToken
        })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, "Invalid user id in token");
        ApiError::InvalidToken
    })?;

    Ok(AuthUser::new(user_id))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        resolve(&AppState::from_ref(state), bearer.token())
    }
}

/// Caller identity when one was presented.
///
/// No header yields `None` and the service decides whether anonymous access
/// is allowed. A header carrying a bad token is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<Snowflake> {
        self.0.map(|auth| auth.user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match optional_bearer(parts, state).await? {
            Some(bearer) => {
                let auth = resolve(&AppState::from_ref(state), bearer.token())?;
                Ok(OptionalAuthUser(Some(auth)))
            }
            None => Ok(OptionalAuthUser(None)),
        }
    }
}

/// `None` only when no Authorization header was sent
async fn optional_bearer<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> Result<Option<Bearer>, ApiError> {
    match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
        Ok(TypedHeader(Authorization(bearer))) => Ok(Some(bearer)),
        Err(rejection) if rejection.is_missing() => Ok(None),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Malformed authorization header");
            Err(ApiError::InvalidToken)
        }
    }
}

//! User service - profiles and account settings

use chrono::Utc;
use feed_common::{hash_password, validate_password_strength};
use feed_core::events::UserUpdatedEvent;
use feed_core::{normalize_email, DomainError, DomainEvent, Snowflake, User};
use tracing::{info, instrument};

use crate::dto::{
    CurrentProfileResponse, CurrentUserResponse, FeedPageRequest, PaginatedResponse,
    PostResponse, ProfileResponse, UpdateUserRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::post::PostService;

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public profile with activity totals
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<ProfileResponse> {
        let user = self.find(user_id).await?;
        let stats = self.ctx.user_repo().profile_stats(user_id).await?;

        Ok(ProfileResponse {
            user: UserResponse::from(&user),
            stats: stats.into(),
        })
    }

    /// Own profile, including the email address
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<CurrentProfileResponse> {
        let user = self.find(user_id).await?;
        let stats = self.ctx.user_repo().profile_stats(user_id).await?;

        Ok(CurrentProfileResponse {
            user: CurrentUserResponse::from(&user),
            stats: stats.into(),
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        user_id: Snowflake,
        request: UpdateUserRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        if request.is_empty() {
            return Err(ServiceError::validation("Nothing to update"));
        }

        let mut user = self.find(user_id).await?;

        if let Some(password) = &request.password {
            validate_password_strength(password)?;
        }

        if let Some(username) = request.username {
            let username = username.trim().to_string();
            if username.is_empty() {
                return Err(DomainError::InvalidUsername("must not be blank".into()).into());
            }
            user.set_username(username);
        }

        if let Some(email) = request.email {
            let email = normalize_email(&email);
            if email != user.email {
                if self.ctx.user_repo().email_exists(&email).await? {
                    return Err(DomainError::EmailAlreadyExists.into());
                }
                user.set_email(&email);
            }
        }

        self.ctx.user_repo().update(&user).await?;

        if let Some(password) = request.password {
            let password_hash = hash_password(&password)?;
            self.ctx
                .user_repo()
                .update_password(user_id, &password_hash)
                .await?;
            info!(user_id = %user_id, "Password changed");
        }

        info!(user_id = %user_id, "User updated");

        self.ctx
            .publish(DomainEvent::UserUpdated(UserUpdatedEvent {
                user_id,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(CurrentUserResponse::from(&user))
    }

    /// Posts authored by `user_id`, newest first unless `top` is asked for
    #[instrument(skip(self, page))]
    pub async fn list_user_posts(
        &self,
        user_id: Snowflake,
        page: &FeedPageRequest,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PaginatedResponse<PostResponse>> {
        PostService::new(self.ctx)
            .list_by_author(user_id, page, viewer)
            .await
    }

    async fn find(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}

//! Authentication service
//!
//! Registration, login, refresh-token rotation and logout. Refresh tokens
//! are JWTs whose session is also recorded in the session store, so a
//! revoked token stops working before it expires.

use chrono::Utc;
use feed_common::{hash_password, validate_password_strength, verify_password, AppError};
use feed_core::events::UserCreatedEvent;
use feed_core::{normalize_email, DomainError, DomainEvent, RefreshSession, Snowflake, User};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, RefreshTokenRequest, RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account and sign it in with a long-lived session
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let email = normalize_email(&request.email);
        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let user = User::new(self.ctx.generate_id(), request.name.trim().to_string(), email);
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered");

        self.ctx
            .publish(DomainEvent::UserCreated(UserCreatedEvent {
                user_id: user.id,
                timestamp: Utc::now(),
            }))
            .await;

        self.start_session(&user, Uuid::new_v4().to_string(), true)
            .await
    }

    #[instrument(skip(self, request), fields(email = %request.email, remember_me = request.remember_me))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(AppError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");

        self.start_session(&user, Uuid::new_v4().to_string(), request.remember_me)
            .await
    }

    /// Exchange a refresh token for a new pair. The old token is revoked;
    /// the session id and its persistence carry over.
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let claimed_user = claims.user_id()?;

        let session = self
            .ctx
            .session_store()
            .find(&request.refresh_token)
            .await?
            .filter(|session| session.user_id == claimed_user)
            .ok_or_else(|| {
                warn!(user_id = %claimed_user, "Refresh rejected: session revoked or unknown");
                ServiceError::App(AppError::InvalidToken)
            })?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(session.user_id))?;

        self.ctx
            .session_store()
            .revoke(&request.refresh_token)
            .await?;

        info!(user_id = %user.id, "Tokens refreshed");

        self.start_session(&user, session.session_id, session.remember_me)
            .await
    }

    /// End one session, or every session of the user when no token is given
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(&self, user_id: Snowflake, refresh_token: Option<String>) -> ServiceResult<()> {
        match refresh_token {
            Some(token) => {
                let owned = self
                    .ctx
                    .session_store()
                    .find(&token)
                    .await?
                    .is_some_and(|session| session.user_id == user_id);
                if owned {
                    self.ctx.session_store().revoke(&token).await?;
                }
            }
            None => {
                let count = self.ctx.session_store().revoke_all(user_id).await?;
                info!(user_id = %user_id, count, "All sessions ended");
            }
        }

        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Resolve an access token to its user id
    pub fn validate_token(&self, token: &str) -> ServiceResult<Snowflake> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;
        Ok(claims.user_id()?)
    }

    async fn start_session(
        &self,
        user: &User,
        session_id: String,
        remember_me: bool,
    ) -> ServiceResult<AuthResponse> {
        let tokens = self
            .ctx
            .jwt_service()
            .issue(user.id, &session_id, remember_me)?;

        let ttl = u64::try_from(tokens.refresh_expires_in)
            .map_err(|_| ServiceError::internal("negative refresh lifetime"))?;
        let session = RefreshSession::new(user.id, session_id, remember_me);
        self.ctx
            .session_store()
            .store(&tokens.refresh_token, &session, ttl)
            .await?;

        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            refresh_expires_in: tokens.refresh_expires_in,
            user: CurrentUserResponse::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::TestHarness;

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "ada".into(),
            email: email.into(),
            password: "correct horse 1".into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let harness = TestHarness::new();
        let auth = AuthService::new(&harness.ctx);

        let registered = auth.register(register_request("Ada@Example.com")).await.unwrap();
        assert_eq!(registered.user.email, "ada@example.com");
        assert_eq!(registered.token_type, "Bearer");

        let login = auth
            .login(LoginRequest {
                email: "ADA@example.com".into(),
                password: "correct horse 1".into(),
                remember_me: false,
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, registered.user.id);
        assert_eq!(login.refresh_expires_in, 86_400);

        let user_id = auth.validate_token(&login.access_token).unwrap();
        assert_eq!(user_id.to_string(), registered.user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let harness = TestHarness::new();
        let auth = AuthService::new(&harness.ctx);
        auth.register(register_request("ada@example.com")).await.unwrap();

        let err = auth
            .register(register_request(" ADA@example.com "))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "EMAIL_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let harness = TestHarness::new();
        let auth = AuthService::new(&harness.ctx);
        auth.register(register_request("ada@example.com")).await.unwrap();

        let err = auth
            .login(LoginRequest {
                email: "ada@example.com".into(),
                password: "wrong password 2".into(),
                remember_me: true,
            })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CREDENTIALS");
        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_revokes() {
        let harness = TestHarness::new();
        let auth = AuthService::new(&harness.ctx);
        let first = auth.register(register_request("ada@example.com")).await.unwrap();

        let second = auth
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: first.refresh_token.clone(),
            })
            .await
            .unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);

        let reuse = auth
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: first.refresh_token,
            })
            .await
            .unwrap_err();
        assert_eq!(reuse.error_code(), "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_logout_everywhere() {
        let harness = TestHarness::new();
        let auth = AuthService::new(&harness.ctx);
        let session = auth.register(register_request("ada@example.com")).await.unwrap();
        let user_id = auth.validate_token(&session.access_token).unwrap();

        auth.logout(user_id, None).await.unwrap();

        let err = auth
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: session.refresh_token,
            })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TOKEN");
    }
}

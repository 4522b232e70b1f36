//! Access and refresh tokens
//!
//! Access tokens are short-lived bearer tokens. Refresh tokens live either
//! for the configured "remember me" period or for a single-day session, and
//! are additionally tracked server-side so they can be revoked.

use chrono::{Duration, Utc};
use feed_core::Snowflake;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique per token so two refresh tokens issued in the same second differ
    pub jti: String,
    pub token_type: TokenType,
    pub sid: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl Claims {
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenType::Access
    }

    pub fn is_refresh_token(&self) -> bool {
        self.token_type == TokenType::Refresh
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    /// Seconds until the refresh token expires
    pub refresh_expires_in: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    session_token_expiry: i64,
}

impl JwtService {
    pub fn new(
        secret: &str,
        access_token_expiry: i64,
        refresh_token_expiry: i64,
        session_token_expiry: i64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
            session_token_expiry,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            &config.secret,
            config.access_token_expiry,
            config.refresh_token_expiry,
            config.session_token_expiry,
        )
    }

    /// Refresh token lifetime for the chosen persistence
    pub fn refresh_ttl(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.refresh_token_expiry
        } else {
            self.session_token_expiry
        }
    }

    pub fn issue(
        &self,
        user_id: Snowflake,
        session_id: &str,
        remember_me: bool,
    ) -> Result<TokenPair, AppError> {
        let refresh_ttl = self.refresh_ttl(remember_me);
        let access_token = self.encode_token(
            user_id,
            TokenType::Access,
            session_id,
            remember_me,
            self.access_token_expiry,
        )?;
        let refresh_token =
            self.encode_token(user_id, TokenType::Refresh, session_id, remember_me, refresh_ttl)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            refresh_expires_in: refresh_ttl,
        })
    }

    fn encode_token(
        &self,
        user_id: Snowflake,
        token_type: TokenType,
        session_id: &str,
        remember_me: bool,
        ttl: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl)).timestamp(),
            jti: random_id(),
            token_type,
            sid: session_id.to_string(),
            remember_me,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("failed to encode JWT: {e}")))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if claims.is_access_token() {
            Ok(claims)
        } else {
            Err(AppError::InvalidToken)
        }
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if claims.is_refresh_token() {
            Ok(claims)
        } else {
            Err(AppError::InvalidToken)
        }
    }
}

/// 24 random alphanumerics, used for session and token ids
pub fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("session_token_expiry", &self.session_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 900, 2_592_000, 86_400)
    }

    #[test]
    fn test_issue_and_validate() {
        let svc = service();
        let user_id = Snowflake::new(12345);
        let pair = svc.issue(user_id, "sess-1", true).unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);

        let access = svc.validate_access_token(&pair.access_token).unwrap();
        assert_eq!(access.user_id().unwrap(), user_id);
        assert_eq!(access.sid, "sess-1");

        let refresh = svc.validate_refresh_token(&pair.refresh_token).unwrap();
        assert!(refresh.remember_me);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let svc = service();
        let pair = svc.issue(Snowflake::new(1), "s", false).unwrap();
        assert!(matches!(
            svc.validate_access_token(&pair.refresh_token),
            Err(AppError::InvalidToken)
        ));
        assert!(matches!(
            svc.validate_refresh_token(&pair.access_token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_remember_me_controls_refresh_lifetime() {
        let svc = service();
        let long = svc.issue(Snowflake::new(1), "a", true).unwrap();
        let short = svc.issue(Snowflake::new(1), "b", false).unwrap();
        assert_eq!(long.refresh_expires_in, 2_592_000);
        assert_eq!(short.refresh_expires_in, 86_400);

        let claims = svc.decode_token(&short.refresh_token).unwrap();
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let svc = service();
        let a = svc.issue(Snowflake::new(1), "s", true).unwrap();
        let b = svc.issue(Snowflake::new(1), "s", true).unwrap();
        assert_ne!(a.refresh_token, b.refresh_token);
    }

    #[test]
    fn test_expired_token() {
        let svc = JwtService::new("test-secret-key-that-is-long-enough", -120, -120, -120);
        let pair = svc.issue(Snowflake::new(1), "s", false).unwrap();
        assert!(matches!(
            svc.decode_token(&pair.access_token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            service().decode_token("not.a.jwt"),
            Err(AppError::InvalidToken)
        ));
    }
}

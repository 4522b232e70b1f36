//! Application errors for the plumbing below the domain: credentials,
//! tokens, hashing, startup and serving.

use std::fmt;

use feed_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired => 401,
            // Storage outages are retryable by the client
            Self::Database(_) | Self::Cache(_) => 503,
            Self::Config(_) | Self::Server(_) | Self::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) | Self::Cache(_) => "STORAGE_UNAVAILABLE",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Server(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// HTTP status for a domain error
pub fn domain_status(e: &DomainError) -> u16 {
    if e.is_unauthenticated() {
        401
    } else if e.is_authorization() {
        403
    } else if e.is_not_found() {
        404
    } else if e.is_validation() {
        400
    } else if e.is_conflict() {
        409
    } else if e.is_transient() {
        503
    } else {
        500
    }
}

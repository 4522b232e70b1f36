//! Service layer error type
//!
//! Wraps the two lower error families and adds request-level validation.
//! Status and code always come from the wrapped error when there is one.

use feed_common::{domain_status, AppError};
use feed_core::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rule violations and storage failures
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Credentials, tokens, hashing
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// No caller identity, or one that could not be verified
    pub fn is_unauthenticated(&self) -> bool {
        self.status_code() == 401
    }
}

//! # feed-common
//!
//! Shared plumbing: configuration, application errors, authentication helpers
//! and tracing setup.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

pub use auth::{
    hash_password, random_id, validate_password_strength, verify_password, Claims, JwtService,
    TokenPair, TokenType,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, FeedConfig,
    JwtConfig, RateLimitConfig, RedisConfig, ServerConfig, SnowflakeConfig,
};
pub use error::{domain_status, AppError};
pub use telemetry::{init_test_tracing, try_init_tracing, TracingConfig, TracingError};

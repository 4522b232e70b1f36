//! Application configuration
//!
//! Two ways in:
//! - [`AppConfig::from_env`] reads flat variables (`API_PORT`, `DATABASE_URL`, ...)
//!   after loading `.env`.
//! - [`AppConfig::load`] layers built-in defaults, an optional TOML file and
//!   `FEED__SECTION__KEY` environment overrides.
//!
//! [`AppConfig::from_sources`] picks between them: `CONFIG_FILE` selects the
//! layered loader.

use std::env;
use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub snowflake: SnowflakeConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply `migrations/` on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Token lifetimes are in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    /// Lifetime of a "remember me" session
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
    /// Lifetime of a session started without "remember me"
    #[serde(default = "default_session_token_expiry")]
    pub session_token_expiry: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Limits applied to feed content and listings
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
    #[serde(default = "default_max_post_length")]
    pub max_post_length: usize,
    #[serde(default = "default_max_comment_length")]
    pub max_comment_length: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_post_length: default_max_post_length(),
            max_comment_length: default_max_comment_length(),
        }
    }
}

impl FeedConfig {
    /// Clamp a client-requested page size into `1..=max_page_size`
    pub fn page_size(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}

fn default_app_name() -> String {
    "feed-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_redis_max_connections() -> u32 {
    16
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    2_592_000 // 30 days
}

fn default_session_token_expiry() -> i64 {
    86_400 // 1 day
}

fn default_requests_per_second() -> u32 {
    20
}

fn default_burst() -> u32 {
    60
}

fn default_page_size() -> i64 {
    20
}

fn default_max_page_size() -> i64 {
    100
}

fn default_max_post_length() -> usize {
    2000
}

fn default_max_comment_length() -> usize {
    500
}

/// Read an optional variable, failing loudly on unparsable values instead of
/// silently falling back.
fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        Err(_) => Ok(None),
    }
}

fn require_var(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key))
}

impl AppConfig {
    /// Load from flat environment variables (and `.env` when present)
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: parse_var("APP_ENV")?.unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: require_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
                run_migrations: parse_var("DATABASE_RUN_MIGRATIONS")?.unwrap_or(true),
            },
            redis: RedisConfig {
                url: require_var("REDIS_URL")?,
                max_connections: parse_var("REDIS_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_redis_max_connections),
            },
            jwt: JwtConfig {
                secret: require_var("JWT_SECRET")?,
                access_token_expiry: parse_var("JWT_ACCESS_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_access_token_expiry),
                refresh_token_expiry: parse_var("JWT_REFRESH_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_refresh_token_expiry),
                session_token_expiry: parse_var("JWT_SESSION_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_session_token_expiry),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| split_origins(&s))
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_var("WORKER_ID")?.unwrap_or(0),
            },
            feed: FeedConfig {
                default_page_size: parse_var("FEED_DEFAULT_PAGE_SIZE")?
                    .unwrap_or_else(default_page_size),
                max_page_size: parse_var("FEED_MAX_PAGE_SIZE")?
                    .unwrap_or_else(default_max_page_size),
                max_post_length: parse_var("FEED_MAX_POST_LENGTH")?
                    .unwrap_or_else(default_max_post_length),
                max_comment_length: parse_var("FEED_MAX_COMMENT_LENGTH")?
                    .unwrap_or_else(default_max_comment_length),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// `CONFIG_FILE` set: layered load from that file. Otherwise flat variables.
    pub fn from_sources() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        match env::var("CONFIG_FILE") {
            Ok(path) if !path.trim().is_empty() => Self::load(Some(path.trim())),
            _ => Self::from_env(),
        }
    }

    /// Layered load: optional TOML file, then `FEED__SECTION__KEY` overrides.
    pub fn load(file: Option<&str>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::layered(file, env_overrides())
    }

    fn layered(file: Option<&str>, overrides: config::Environment) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let config: Self = builder
            .add_source(overrides)
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ConfigError::Source(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.snowflake.worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                self.snowflake.worker_id.to_string(),
            ));
        }
        if self.jwt.secret.len() < 32 && self.app.env.is_production() {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                "must be at least 32 bytes in production".to_string(),
            ));
        }
        if self.feed.default_page_size < 1 || self.feed.max_page_size < self.feed.default_page_size
        {
            return Err(ConfigError::InvalidValue(
                "FEED_MAX_PAGE_SIZE",
                self.feed.max_page_size.to_string(),
            ));
        }
        Ok(())
    }
}

fn env_overrides() -> config::Environment {
    config::Environment::with_prefix("FEED")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .try_parsing(true)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Configuration source error: {0}")]
    Source(String),
}

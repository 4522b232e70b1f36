//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies. Output is
//! human-readable in development and JSON lines elsewhere.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Environment;

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub level: Level,
    pub json: bool,
    /// Log span open/close, useful when chasing slow requests
    pub span_events: bool,
    pub file_line: bool,
    pub thread_names: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
            thread_names: false,
        }
    }
}

impl TracingConfig {
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            thread_names: true,
            ..Self::default()
        }
    }

    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            json: true,
            file_line: false,
            ..Self::default()
        }
    }

    pub fn for_environment(env: Environment) -> Self {
        if env.is_development() {
            Self::development()
        } else {
            Self::production()
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // sqlx logs every statement at info
            EnvFilter::new(format!("{},sqlx=warn", self.level))
        })
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// return [`TracingError::AlreadyInitialized`].
pub fn try_init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    let json = config.json.then(|| {
        fmt::layer()
            .json()
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_thread_names(config.thread_names)
            .with_span_events(config.span_events())
    });
    let pretty = (!config.json).then(|| {
        fmt::layer()
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_thread_names(config.thread_names)
            .with_span_events(config.span_events())
    });

    tracing_subscriber::registry()
        .with(config.filter())
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Default config, ignoring a subscriber that is already installed (tests)
pub fn init_test_tracing() {
    let _ = try_init_tracing(&TracingConfig::default());
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

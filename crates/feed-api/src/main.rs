//! Feed API server entry point
//!
//! ```bash
//! cargo run -p feed-api
//! ```
//!
//! Configuration comes from environment variables (and `.env`), or from the
//! TOML file named by `CONFIG_FILE` with `FEED__SECTION__KEY` overrides.

use feed_common::{try_init_tracing, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let env = std::env::var("APP_ENV")
        .ok()
        .and_then(|v| v.parse::<Environment>().ok())
        .unwrap_or_default();
    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(env)) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Feed API server...");

    let config = AppConfig::from_sources().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        "Configuration loaded"
    );

    feed_api::run(config).await?;

    Ok(())
}

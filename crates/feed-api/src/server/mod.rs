//! Server setup: wire infrastructure into the application state, build the
//! router and serve it until a shutdown signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use feed_cache::{RedisPool, Subscriber, SubscriberConfig};
use feed_common::{AppConfig, AppError, JwtService};
use feed_core::SnowflakeGenerator;
use feed_db::{create_pool, migrations_dir, run_migrations};
use feed_service::ServiceContext;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Rate-limited API routes plus health routes that bypass the limiter
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let api = {
        let config = state.config();
        apply_middleware(
            create_router(),
            &config.rate_limit,
            &config.cors,
            config.app.env.is_production(),
        )?
    };

    Ok(api.merge(health_routes()).with_state(state))
}

pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, &migrations_dir())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
        config.jwt.session_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContext::from_infrastructure(
        pool.clone(),
        redis_pool.clone(),
        jwt_service,
        snowflake_generator,
        config.feed.clone(),
    );

    let subscriber = Subscriber::spawn(SubscriberConfig {
        redis_url: config.redis.url.clone(),
        ..SubscriberConfig::default()
    });

    Ok(AppState::new(
        service_context,
        config,
        pool,
        redis_pool,
        subscriber,
    ))
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state.clone())?;

    let result = run_server(app, addr).await;

    if let Err(e) = state.subscriber().shutdown().await {
        tracing::warn!(error = %e, "Subscriber did not shut down cleanly");
    }
    info!("Server stopped");
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

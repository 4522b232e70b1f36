//! Liveness and readiness probes

use axum::{extract::State, http::StatusCode, Json};
use feed_service::dto::{HealthResponse, ReadinessResponse};
use tracing::warn;

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let (db, redis) = tokio::join!(
        feed_db::ping(state.pool()),
        state.redis_pool().health_check()
    );

    if let Err(e) = &db {
        warn!(error = %e, "PostgreSQL readiness check failed");
    }
    if let Err(e) = &redis {
        warn!(error = %e, "Redis readiness check failed");
    }

    let response = ReadinessResponse::ready(db.is_ok(), redis.is_ok());
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

//! Application state shared across all handlers

use std::sync::Arc;

use feed_cache::{RedisPool, Subscriber};
use feed_common::{AppConfig, JwtService};
use feed_db::PgPool;
use feed_service::ServiceContext;

#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    /// Raw pools, only for readiness probes
    pool: PgPool,
    redis_pool: RedisPool,
    /// One pub/sub listener per process, shared by every event stream
    subscriber: Arc<Subscriber>,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        pool: PgPool,
        redis_pool: RedisPool,
        subscriber: Subscriber,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            pool,
            redis_pool,
            subscriber: Arc::new(subscriber),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> &RedisPool {
        &self.redis_pool
    }

    pub fn subscriber(&self) -> &Subscriber {
        &self.subscriber
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("app", &self.config.app.name)
            .field("event_streams", &self.subscriber.receiver_count())
            .finish_non_exhaustive()
    }
}

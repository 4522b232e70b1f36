//! Service context - dependency container for services
//!
//! Everything is held behind the `feed-core` traits, so services run the same
//! against PostgreSQL/Redis and against in-memory stores.

use std::sync::Arc;

use feed_cache::{Publisher, RedisPool, RefreshTokenStore};
use feed_common::{FeedConfig, JwtService};
use feed_core::{
    CommentRepository, DomainEvent, EventPublisher, PostRepository, ReactionRepository,
    SessionStore, Snowflake, SnowflakeGenerator, UserRepository,
};
use feed_db::{
    PgCommentRepository, PgPool, PgPostRepository, PgReactionRepository, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    // Sessions and fan-out
    session_store: Arc<dyn SessionStore>,
    publisher: Arc<dyn EventPublisher>,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    feed_config: FeedConfig,
}

impl ServiceContext {
    /// Wire the PostgreSQL repositories and the Redis session store and
    /// publisher.
    pub fn from_infrastructure(
        pool: PgPool,
        redis_pool: RedisPool,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        feed_config: FeedConfig,
    ) -> Self {
        Self {
            user_repo: Arc::new(PgUserRepository::new(pool.clone())),
            post_repo: Arc::new(PgPostRepository::new(pool.clone())),
            comment_repo: Arc::new(PgCommentRepository::new(pool.clone())),
            reaction_repo: Arc::new(PgReactionRepository::new(pool)),
            session_store: Arc::new(RefreshTokenStore::new(redis_pool.clone())),
            publisher: Arc::new(Publisher::new(redis_pool)),
            jwt_service,
            snowflake_generator,
            feed_config,
        }
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Sessions / Pub/Sub ===

    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    /// Publish after a committed change. Observers are passive: a failed
    /// publish is logged and never fails the operation.
    pub async fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            tracing::warn!(
                event_type = event.event_type(),
                error = %e,
                "Failed to publish event"
            );
        }
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn feed_config(&self) -> &FeedConfig {
        &self.feed_config
    }

    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("feed_config", &self.feed_config)
            .finish()
    }
}

/// Builder for `ServiceContext`; every dependency except the feed settings
/// is required.
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    session_store: Option<Arc<dyn SessionStore>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    feed_config: Option<FeedConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn feed_config(mut self, config: FeedConfig) -> Self {
        self.feed_config = Some(config);
        self
    }

    /// # Errors
    /// `ServiceError::Validation` naming the first missing dependency
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            post_repo: required(self.post_repo, "post_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            reaction_repo: required(self.reaction_repo, "reaction_repo")?,
            session_store: required(self.session_store, "session_store")?,
            publisher: required(self.publisher, "publisher")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            feed_config: self.feed_config.unwrap_or_default(),
        })
    }
}

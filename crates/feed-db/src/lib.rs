//! # feed-db
//!
//! PostgreSQL implementations of the `feed-core` repository traits.
//!
//! - Connection pool and migrations
//! - `FromRow` models
//! - Row to entity mappers that validate reaction invariants
//! - Repositories, including the transactional reaction toggle
//!
//! ```rust,ignore
//! use feed_db::{create_pool, PgReactionRepository};
//!
//! let pool = create_pool(&config.database).await?;
//! let reactions = PgReactionRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, migrations_dir, ping, run_migrations, PgPool};
pub use repositories::{
    PgCommentRepository, PgPostRepository, PgReactionRepository, PgUserRepository,
};

//! Database connection pool management

mod postgres;

pub use postgres::{
    create_pool, migrations_dir, ping, run_migrations, DEFAULT_MIGRATIONS_DIR,
};

pub use sqlx::postgres::PgPool;

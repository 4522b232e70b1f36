//! Database models - SQLx row types for the PostgreSQL tables

mod post;
mod user;

pub use post::{CommentModel, PostModel, ReactionRowModel};
pub use user::{ProfileStatsModel, UserModel};

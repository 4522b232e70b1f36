//! Route handlers, one module per resource

pub mod auth;
pub mod comments;
pub mod events;
pub mod health;
pub mod posts;
pub mod reactions;
pub mod users;

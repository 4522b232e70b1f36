//! # feed-api
//!
//! REST server for the feed plus Server-Sent Event streams of live
//! updates, built on Axum.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;

//! End-to-end helpers for the feed API
//!
//! Spawns the real router on a local port and talks to it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;

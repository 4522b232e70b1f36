//! Telemetry and tracing setup

mod tracing_setup;

pub use tracing_setup::{init_test_tracing, try_init_tracing, TracingConfig, TracingError};

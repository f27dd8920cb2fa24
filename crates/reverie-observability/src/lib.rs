//! # reverie-observability
//!
//! Structured logging setup and the span macros used across the workspace.

pub mod tracing_setup;

pub use tracing_setup::init_tracing;
pub use tracing_setup::spans::names;

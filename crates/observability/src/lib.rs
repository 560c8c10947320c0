//! `clearbooks-observability` — tracing/logging setup.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use tracing::{init, init_with_filter};

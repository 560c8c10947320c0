//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops). Filtering is
/// taken from `RUST_LOG`, defaulting to `info`.
pub fn init() {
    init_filtered(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
}

/// Initialize with an explicit filter directive, typically the `log_filter`
/// configuration key.
pub fn init_with_filter(filter: &str) {
    init_filtered(EnvFilter::new(filter));
}

fn init_filtered(filter: EnvFilter) {
    // JSON logs + timestamps.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

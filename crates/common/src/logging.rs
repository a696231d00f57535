//! Tracing setup for the binary and test harnesses.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. `RUST_LOG` controls the filter,
/// defaulting to `info`. Calling this twice is a no-op, so tests can
/// call it freely.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

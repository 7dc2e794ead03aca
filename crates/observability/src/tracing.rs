//! Tracing/logging initialization.
//!
//! JSON lines to stdout, filtered via `RUST_LOG` with an `info` default.
//! The report modules emit data-integrity warnings (overlapping price
//! intervals, for example) through `tracing`, so a subscriber should be
//! installed before the first report runs.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times; a second call finds a subscriber already
/// installed and leaves it alone.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

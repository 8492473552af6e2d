//! Logging setup
//!
//! Thin wrapper over `tracing-subscriber` for binaries and tests. The
//! library itself only emits `tracing` events and never installs a
//! subscriber on its own.

use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the global subscriber, honoring `RUST_LOG`
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Initialize the global subscriber with an explicit fallback filter
pub fn init_with(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

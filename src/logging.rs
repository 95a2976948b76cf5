//! Log Initialization
//!
//! The library itself only emits `tracing` events; the embedding shell
//! decides where they go. This helper installs a sensible default
//! subscriber (stderr, `RUST_LOG`-style filtering) for shells that do
//! not bring their own.

use tracing_subscriber::EnvFilter;

/// Install the default fmt subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

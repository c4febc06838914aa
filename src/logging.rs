//! Diagnostic logging to stderr, filtered by `HALP_LOG`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "HALP_LOG";

/// Install the global subscriber. Defaults to warnings only; calling it
/// twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

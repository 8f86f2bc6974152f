//! Structured logging
//!
//! JSON lines on stderr; stdout stays reserved for responses. `RUST_LOG`
//! overrides the configured level when set.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Returns `false` if one was already
/// installed, which is harmless.
pub fn init_logging(default_level: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

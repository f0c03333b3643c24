//! Shared helpers for integration tests.

use std::time::Duration;

use envilog_console::config::ConsoleConfig;

/// Install a test subscriber honoring `RUST_LOG`. Safe to call from every
/// test; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Config pointing at a mock server, with timeouts and cadence shortened
/// so timeout-classification tests run in milliseconds.
pub fn fast_config(base_url: &str) -> ConsoleConfig {
    let mut config = ConsoleConfig::with_base_url(base_url);
    config.poll_interval = Duration::from_millis(50);
    config.status_timeout = Duration::from_millis(250);
    config.submit_timeout = Duration::from_millis(400);
    config
}

//! Console configuration.
//!
//! All tunables live in [`ConsoleConfig`], an owned value threaded through
//! the controller explicitly. Defaults match the EnviLog device firmware.

use std::time::Duration;

/// Default device base URL (mDNS hostname published by the device).
pub const DEFAULT_BASE_URL: &str = "http://envilog.local";

/// Cadence of the status poller.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Timeout for routine status reads.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Timeout for credential/mode submissions. Longer than the routine read
/// timeout: committing credentials makes the device attempt the actual WiFi
/// join before it responds.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(8);

/// The device's own configuration access point.
///
/// These values are fixed in the device firmware. They are carried as
/// constants rather than fetched state: the whole point of the fallback
/// network is that it must be displayable while the device is unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackAp {
    /// SSID the device broadcasts in access-point mode
    pub ssid: String,
    /// Fixed setup passphrase
    pub passphrase: String,
    /// Fixed address the device serves on its own network
    pub address: String,
}

impl Default for FallbackAp {
    fn default() -> Self {
        Self {
            ssid: "EnviLog".to_string(),
            passphrase: "envilog-setup".to_string(),
            address: "192.168.4.1".to_string(),
        }
    }
}

/// Configuration for the console controller.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the device's HTTP API
    pub base_url: String,
    /// Interval between status poller ticks
    pub poll_interval: Duration,
    /// Per-request timeout for routine status reads
    pub status_timeout: Duration,
    /// Per-request timeout for credential/mode submissions
    pub submit_timeout: Duration,
    /// Consecutive probe failures before the poller stops itself
    pub failure_threshold: u32,
    /// The device's fallback access point
    pub fallback_ap: FallbackAp,
    /// Well-known hostname to browse to after a network change
    pub device_hostname: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            failure_threshold: 1,
            fallback_ap: FallbackAp::default(),
            device_hostname: "envilog.local".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Create a configuration pointing at a custom base URL, keeping all
    /// other defaults. Used by tests against a local mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.base_url, "http://envilog.local");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.status_timeout, Duration::from_secs(3));
        assert_eq!(config.submit_timeout, Duration::from_secs(8));
        assert_eq!(config.failure_threshold, 1);
        assert_eq!(config.device_hostname, "envilog.local");
    }

    #[test]
    fn test_default_fallback_ap() {
        let ap = FallbackAp::default();
        assert_eq!(ap.ssid, "EnviLog");
        assert_eq!(ap.address, "192.168.4.1");
        assert!(!ap.passphrase.is_empty());
    }

    #[test]
    fn test_with_base_url() {
        let config = ConsoleConfig::with_base_url("http://127.0.0.1:8080");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }
}

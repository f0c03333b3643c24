//! Status poller.
//!
//! Periodic health probe of the device. The system-info fetch doubles as
//! the probe; on success the rest of the refresh (network status, sensor
//! reading) fans out concurrently within the same tick. Ticks are
//! serialized: the next probe is only scheduled after the current tick's
//! work has fully resolved.
//!
//! The poller stops itself once consecutive probe failures reach the
//! configured threshold (one, by default): once the device is unreachable,
//! usually because it is mid network-mode switch, further probes only waste
//! the successor network's bandwidth and produce confusing stale UI. The
//! guidance flow or a manual refresh restarts it explicitly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ConsoleConfig;
use crate::device::DeviceClient;
use crate::events::ConsoleEvent;

/// Periodic device status poller.
pub struct StatusPoller {
    client: Arc<DeviceClient>,
    events: mpsc::Sender<ConsoleEvent>,
    interval: Duration,
    failure_threshold: u32,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Create a stopped poller.
    pub fn new(
        client: Arc<DeviceClient>,
        config: &ConsoleConfig,
        events: mpsc::Sender<ConsoleEvent>,
    ) -> Self {
        Self {
            client,
            events,
            interval: config.poll_interval,
            failure_threshold: config.failure_threshold.max(1),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// True while the polling task is scheduled.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start polling. No-op when already running.
    ///
    /// The first probe is issued immediately; subsequent ticks follow at
    /// the configured interval.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        // Reap a task left over from a previous run or auto-stop
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        tracing::info!(interval = ?self.interval, "status poller starting");
        self.running.store(true, Ordering::SeqCst);

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        let running = Arc::clone(&self.running);
        let interval = self.interval;
        let threshold = self.failure_threshold;

        self.handle = Some(tokio::spawn(async move {
            let mut consecutive_failures = 0u32;

            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                match client.fetch_system().await {
                    Ok(info) => {
                        consecutive_failures = 0;
                        let _ = events.send(ConsoleEvent::SystemUpdated(info)).await;

                        // Remaining refresh fetches are independent; each
                        // failure only costs that query's update.
                        let (network, sensor) =
                            tokio::join!(client.fetch_network(), client.fetch_sensor());

                        match network {
                            Ok(raw) => {
                                let _ = events.send(ConsoleEvent::NetworkFetched(raw)).await;
                            }
                            Err(e) => tracing::warn!(error = %e, "network refresh failed"),
                        }
                        match sensor {
                            Ok(reading) => {
                                let _ = events.send(ConsoleEvent::SensorUpdated(reading)).await;
                            }
                            Err(e) => tracing::warn!(error = %e, "sensor refresh failed"),
                        }
                    }
                    Err(e) => {
                        consecutive_failures += 1;
                        tracing::warn!(
                            error = %e,
                            consecutive_failures,
                            "status probe failed"
                        );
                        if consecutive_failures >= threshold {
                            tracing::info!("status poller stopping after sustained failures");
                            running.store(false, Ordering::SeqCst);
                            let _ = events
                                .send(ConsoleEvent::PollerStopped {
                                    consecutive_failures,
                                })
                                .await;
                            break;
                        }
                    }
                }

                tokio::time::sleep(interval).await;
            }
        }));
    }

    /// Stop polling and cancel any pending timer. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!("status poller stopped");
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::{HttpError, Response};
    use bytes::Bytes;
    use tokio::time::timeout;

    const SYSTEM_BODY: &str = r#"{"free_heap": 180000, "uptime_ms": 5000}"#;
    const NETWORK_BODY: &str = r#"{"mode": "station", "is_provisioned": true,
        "sta_ssid": "HomeNet", "sta_status": "connected"}"#;
    const SENSOR_BODY: &str = r#"{"valid": true, "temperature": 22.5, "humidity": 40.0}"#;

    fn poller_with_mock(
        mock: &MockHttpClient,
        interval: Duration,
    ) -> (StatusPoller, mpsc::Receiver<ConsoleEvent>) {
        let mut config = ConsoleConfig::with_base_url("http://device");
        config.poll_interval = interval;
        let client = Arc::new(DeviceClient::with_http_client(
            &config,
            Arc::new(mock.clone()),
        ));
        let (tx, rx) = mpsc::channel(32);
        (StatusPoller::new(client, &config, tx), rx)
    }

    fn mock_healthy_device() -> MockHttpClient {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://device/api/v1/system",
            MockResponse::Success(Response::new(200, Bytes::from(SYSTEM_BODY))),
        );
        mock.set_response(
            "http://device/api/v1/network",
            MockResponse::Success(Response::new(200, Bytes::from(NETWORK_BODY))),
        );
        mock.set_response(
            "http://device/api/v1/sensors/dht11",
            MockResponse::Success(Response::new(200, Bytes::from(SENSOR_BODY))),
        );
        mock
    }

    async fn next_event(rx: &mut mpsc::Receiver<ConsoleEvent>) -> ConsoleEvent {
        timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_successful_tick_emits_full_refresh() {
        let mock = mock_healthy_device();
        let (mut poller, mut rx) = poller_with_mock(&mock, Duration::from_secs(60));

        poller.start();

        assert!(matches!(
            next_event(&mut rx).await,
            ConsoleEvent::SystemUpdated(_)
        ));
        // Network and sensor fetches are concurrent; order between the two
        // events is not guaranteed.
        let (a, b) = (next_event(&mut rx).await, next_event(&mut rx).await);
        let mut saw_network = false;
        let mut saw_sensor = false;
        for event in [a, b] {
            match event {
                ConsoleEvent::NetworkFetched(raw) => {
                    assert_eq!(raw.mode, "station");
                    saw_network = true;
                }
                ConsoleEvent::SensorUpdated(reading) => {
                    assert!(reading.valid);
                    saw_sensor = true;
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert!(saw_network && saw_sensor);
        assert!(poller.is_running());

        poller.stop();
    }

    #[tokio::test]
    async fn test_single_probe_failure_stops_poller() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://device/api/v1/system",
            MockResponse::Error(HttpError::Timeout("probe".to_string())),
        );
        let (mut poller, mut rx) = poller_with_mock(&mock, Duration::from_millis(10));

        poller.start();

        match next_event(&mut rx).await {
            ConsoleEvent::PollerStopped {
                consecutive_failures,
            } => assert_eq!(consecutive_failures, 1),
            other => panic!("expected PollerStopped, got {:?}", other),
        }
        assert!(!poller.is_running());

        // No further probes after auto-stop
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_probe_failure_does_not_fetch_rest() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));
        let (mut poller, mut rx) = poller_with_mock(&mock, Duration::from_millis(10));

        poller.start();
        next_event(&mut rx).await;

        let urls: Vec<String> = mock.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["http://device/api/v1/system".to_string()]);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mock = mock_healthy_device();
        let (mut poller, _rx) = poller_with_mock(&mock, Duration::from_secs(60));

        poller.stop();
        assert!(!poller.is_running());

        poller.start();
        assert!(poller.is_running());
        poller.stop();
        poller.stop();
        assert!(!poller.is_running());
    }

    #[tokio::test]
    async fn test_start_is_idempotent_while_running() {
        let mock = mock_healthy_device();
        let (mut poller, mut rx) = poller_with_mock(&mock, Duration::from_secs(60));

        poller.start();
        // Drain the first tick before the second start call
        for _ in 0..3 {
            next_event(&mut rx).await;
        }
        poller.start();

        tokio::time::sleep(Duration::from_millis(50)).await;
        // One tick's worth of requests only
        assert_eq!(mock.requests().len(), 3);

        poller.stop();
    }

    #[tokio::test]
    async fn test_restart_after_auto_stop() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://device/api/v1/system",
            MockResponse::Error(HttpError::Timeout("probe".to_string())),
        );
        let (mut poller, mut rx) = poller_with_mock(&mock, Duration::from_millis(10));

        poller.start();
        next_event(&mut rx).await;
        assert!(!poller.is_running());

        // Device is back
        mock.set_response(
            "http://device/api/v1/system",
            MockResponse::Success(Response::new(200, Bytes::from(SYSTEM_BODY))),
        );
        mock.set_response(
            "http://device/api/v1/network",
            MockResponse::Success(Response::new(200, Bytes::from(NETWORK_BODY))),
        );
        mock.set_response(
            "http://device/api/v1/sensors/dht11",
            MockResponse::Success(Response::new(200, Bytes::from(SENSOR_BODY))),
        );

        poller.start();
        assert!(poller.is_running());
        assert!(matches!(
            next_event(&mut rx).await,
            ConsoleEvent::SystemUpdated(_)
        ));

        poller.stop();
    }
}

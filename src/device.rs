//! Device API client.
//!
//! Typed client for the EnviLog device's REST API, one method per endpoint.
//! All calls go through the [`HttpClient`] seam with an explicit timeout:
//! 3 s for routine reads, 8 s for submissions that make the device attempt
//! a WiFi join before responding.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::adapters::ReqwestHttpClient;
use crate::config::ConsoleConfig;
use crate::models::{
    ModeSwitchAck, ModeSwitchRequest, MqttConfigPayload, NetworkConfigPayload, RawNetworkStatus,
    SensorReading, SystemInfo,
};
use crate::status::SwitchTarget;
use crate::traits::{HttpClient, HttpError, Response};

const SYSTEM_PATH: &str = "/api/v1/system";
const NETWORK_PATH: &str = "/api/v1/network";
const SENSOR_PATH: &str = "/api/v1/sensors/dht11";
const NETWORK_CONFIG_PATH: &str = "/api/v1/config/network";
const MQTT_CONFIG_PATH: &str = "/api/v1/config/mqtt";
const NETWORK_MODE_PATH: &str = "/api/v1/network/mode";

/// Error type for device API operations.
#[derive(Debug)]
pub enum DeviceApiError {
    /// The request never produced an HTTP response
    Transport(HttpError),
    /// The device answered with a non-success status and a message
    Rejection { status: u16, message: String },
    /// A success response carried an undecodable body
    Decode(serde_json::Error),
}

impl DeviceApiError {
    /// True when the request failed below the HTTP response level.
    pub fn is_transport(&self) -> bool {
        matches!(self, DeviceApiError::Transport(_))
    }
}

impl std::fmt::Display for DeviceApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceApiError::Transport(e) => write!(f, "transport error: {}", e),
            DeviceApiError::Rejection { status, message } => {
                write!(f, "device rejected request ({}): {}", status, message)
            }
            DeviceApiError::Decode(e) => write!(f, "response decode error: {}", e),
        }
    }
}

impl std::error::Error for DeviceApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceApiError::Transport(e) => Some(e),
            DeviceApiError::Rejection { .. } => None,
            DeviceApiError::Decode(e) => Some(e),
        }
    }
}

impl From<HttpError> for DeviceApiError {
    fn from(e: HttpError) -> Self {
        DeviceApiError::Transport(e)
    }
}

impl From<serde_json::Error> for DeviceApiError {
    fn from(e: serde_json::Error) -> Self {
        DeviceApiError::Decode(e)
    }
}

/// Extract a human-readable message from a rejection body.
///
/// The firmware answers rejections with either a JSON object carrying a
/// `message` or `error` field, or plain text.
fn rejection_message(response: &Response) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        error: Option<String>,
    }

    if let Ok(body) = response.json::<ErrorBody>() {
        if let Some(message) = body.message.or(body.error) {
            if !message.trim().is_empty() {
                return message;
            }
        }
    }

    match response.text() {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => format!("HTTP {}", response.status),
    }
}

/// Client for the EnviLog device REST API.
pub struct DeviceClient {
    base_url: String,
    status_timeout: Duration,
    submit_timeout: Duration,
    http: Arc<dyn HttpClient>,
}

impl DeviceClient {
    /// Create a client using the production reqwest transport.
    pub fn new(config: &ConsoleConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    /// Create a client over a caller-provided transport (tests inject the
    /// mock here).
    pub fn with_http_client(config: &ConsoleConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            status_timeout: config.status_timeout,
            submit_timeout: config.submit_timeout,
            http,
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, DeviceApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "device GET");

        let response = self.http.get(&url, timeout).await?;
        if !response.is_success() {
            let message = rejection_message(&response);
            tracing::warn!(url = %url, status = response.status, %message, "device GET rejected");
            return Err(DeviceApiError::Rejection {
                status: response.status,
                message,
            });
        }

        Ok(response.json()?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned + Default>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, DeviceApiError> {
        let url = format!("{}{}", self.base_url, path);
        let body = serde_json::to_string(body)?;
        tracing::debug!(url = %url, "device POST");

        let response = self.http.post_json(&url, &body, timeout).await?;
        if !response.is_success() {
            let message = rejection_message(&response);
            tracing::warn!(url = %url, status = response.status, %message, "device POST rejected");
            return Err(DeviceApiError::Rejection {
                status: response.status,
                message,
            });
        }

        // Success bodies are optional on this API; an empty or
        // non-JSON body counts as an empty ack.
        Ok(response.json().unwrap_or_default())
    }

    /// `GET /api/v1/system`. Doubles as the poller's health probe.
    pub async fn fetch_system(&self) -> Result<SystemInfo, DeviceApiError> {
        self.get_json(SYSTEM_PATH, self.status_timeout).await
    }

    /// `GET /api/v1/network`.
    pub async fn fetch_network(&self) -> Result<RawNetworkStatus, DeviceApiError> {
        self.get_json(NETWORK_PATH, self.status_timeout).await
    }

    /// `GET /api/v1/sensors/dht11`.
    pub async fn fetch_sensor(&self) -> Result<SensorReading, DeviceApiError> {
        self.get_json(SENSOR_PATH, self.status_timeout).await
    }

    /// `GET /api/v1/config/network`.
    pub async fn fetch_network_config(&self) -> Result<NetworkConfigPayload, DeviceApiError> {
        self.get_json(NETWORK_CONFIG_PATH, self.status_timeout).await
    }

    /// `POST /api/v1/config/network`.
    ///
    /// Accepting new credentials may drop the very connection carrying this
    /// request; the caller classifies transport failures accordingly.
    pub async fn submit_network_config(
        &self,
        payload: &NetworkConfigPayload,
    ) -> Result<(), DeviceApiError> {
        #[derive(serde::Deserialize, Default)]
        struct Ack {
            #[serde(default)]
            #[allow(dead_code)]
            status: Option<String>,
        }

        let _: Ack = self
            .post_json(NETWORK_CONFIG_PATH, payload, self.submit_timeout)
            .await?;
        Ok(())
    }

    /// `GET /api/v1/config/mqtt`.
    pub async fn fetch_mqtt_config(&self) -> Result<MqttConfigPayload, DeviceApiError> {
        self.get_json(MQTT_CONFIG_PATH, self.status_timeout).await
    }

    /// `POST /api/v1/config/mqtt`.
    pub async fn submit_mqtt_config(
        &self,
        payload: &MqttConfigPayload,
    ) -> Result<(), DeviceApiError> {
        let _: ModeSwitchAck = self
            .post_json(MQTT_CONFIG_PATH, payload, self.submit_timeout)
            .await?;
        Ok(())
    }

    /// `POST /api/v1/network/mode`.
    pub async fn switch_mode(&self, target: SwitchTarget) -> Result<ModeSwitchAck, DeviceApiError> {
        let request = ModeSwitchRequest {
            mode: target.wire_str().to_string(),
        };
        self.post_json(NETWORK_MODE_PATH, &request, self.submit_timeout)
            .await
    }
}

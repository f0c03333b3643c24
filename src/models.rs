//! Wire types for the device REST API.
//!
//! Field names and optionality follow the device firmware's JSON handlers.
//! Everything the device may omit is `Option` with a serde default, so a
//! firmware that predates a field still parses.

use serde::{Deserialize, Serialize};

/// Payload of `GET /api/v1/system`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemInfo {
    /// Free heap in bytes
    pub free_heap: u64,
    /// Minimum free heap since boot, in bytes
    #[serde(default)]
    pub min_heap: Option<u64>,
    /// Uptime in milliseconds
    pub uptime_ms: u64,
}

/// Payload of `GET /api/v1/network`, before normalization.
///
/// Both mode-specific field groups may appear here; normalization into a
/// [`crate::status::NetworkSnapshot`] drops the group that does not belong
/// to the active mode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNetworkStatus {
    /// Network mode: `"station"`, `"ap"` or `"switching"`
    #[serde(default)]
    pub mode: String,
    /// Whether WiFi credentials are stored on the device
    #[serde(default)]
    pub is_provisioned: bool,
    /// SSID the station is configured to join
    #[serde(default)]
    pub sta_ssid: Option<String>,
    /// Station link status: `"connected"` or `"disconnected"`
    #[serde(default)]
    pub sta_status: Option<String>,
    /// IP address assigned to the station interface
    #[serde(default)]
    pub sta_ip_address: Option<String>,
    /// Signal strength in dBm
    #[serde(default)]
    pub sta_rssi: Option<i32>,
    /// SSID of the device's own access point
    #[serde(default)]
    pub ap_ssid: Option<String>,
    /// IP address the access point serves on
    #[serde(default)]
    pub ap_ip_address: Option<String>,
}

/// Payload of `GET /api/v1/sensors/dht11`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorReading {
    /// Whether the reading is valid
    pub valid: bool,
    /// Temperature in Celsius
    pub temperature: f32,
    /// Relative humidity percentage
    pub humidity: f32,
    /// Device-side reading timestamp
    #[serde(default)]
    pub timestamp: Option<u64>,
}

/// Payload of `GET`/`POST /api/v1/config/network`.
///
/// The device never echoes the stored password on GET, so the field
/// defaults to empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfigPayload {
    /// SSID of the network the device should join
    pub wifi_ssid: String,
    /// Passphrase for that network
    #[serde(default)]
    pub wifi_password: String,
}

/// Payload of `GET`/`POST /api/v1/config/mqtt`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MqttConfigPayload {
    /// MQTT broker URL
    pub broker_url: String,
}

/// Request body of `POST /api/v1/network/mode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeSwitchRequest {
    /// Target mode wire string: `"ap"` or `"station"`
    pub mode: String,
}

/// Success body of `POST /api/v1/network/mode`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModeSwitchAck {
    /// Optional human-readable confirmation
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_info_full() {
        let json = r#"{"free_heap": 182044, "min_heap": 171200, "uptime_ms": 93511}"#;
        let info: SystemInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.free_heap, 182044);
        assert_eq!(info.min_heap, Some(171200));
        assert_eq!(info.uptime_ms, 93511);
    }

    #[test]
    fn test_system_info_without_min_heap() {
        let json = r#"{"free_heap": 182044, "uptime_ms": 93511}"#;
        let info: SystemInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.min_heap, None);
    }

    #[test]
    fn test_raw_network_status_station() {
        let json = r#"{
            "mode": "station",
            "is_provisioned": true,
            "sta_ssid": "HomeNet",
            "sta_status": "connected",
            "sta_ip_address": "192.168.1.42",
            "sta_rssi": -55
        }"#;
        let raw: RawNetworkStatus = serde_json::from_str(json).unwrap();
        assert_eq!(raw.mode, "station");
        assert!(raw.is_provisioned);
        assert_eq!(raw.sta_ssid.as_deref(), Some("HomeNet"));
        assert_eq!(raw.sta_rssi, Some(-55));
        assert!(raw.ap_ssid.is_none());
    }

    #[test]
    fn test_raw_network_status_ap() {
        let json = r#"{
            "mode": "ap",
            "is_provisioned": false,
            "ap_ssid": "EnviLog",
            "ap_ip_address": "192.168.4.1"
        }"#;
        let raw: RawNetworkStatus = serde_json::from_str(json).unwrap();
        assert_eq!(raw.mode, "ap");
        assert!(!raw.is_provisioned);
        assert_eq!(raw.ap_ssid.as_deref(), Some("EnviLog"));
        assert!(raw.sta_ssid.is_none());
    }

    #[test]
    fn test_raw_network_status_empty_object() {
        let raw: RawNetworkStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(raw.mode, "");
        assert!(!raw.is_provisioned);
    }

    #[test]
    fn test_sensor_reading() {
        let json = r#"{"valid": true, "temperature": 23.4, "humidity": 48.0, "timestamp": 93000}"#;
        let reading: SensorReading = serde_json::from_str(json).unwrap();
        assert!(reading.valid);
        assert_eq!(reading.temperature, 23.4);
        assert_eq!(reading.humidity, 48.0);
        assert_eq!(reading.timestamp, Some(93000));
    }

    #[test]
    fn test_network_config_roundtrip() {
        let payload = NetworkConfigPayload {
            wifi_ssid: "HomeNet".to_string(),
            wifi_password: "hunter2".to_string(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""wifi_ssid":"HomeNet""#));
        assert!(json.contains(r#""wifi_password":"hunter2""#));
    }

    #[test]
    fn test_network_config_get_omits_password() {
        let json = r#"{"wifi_ssid": "HomeNet"}"#;
        let payload: NetworkConfigPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.wifi_ssid, "HomeNet");
        assert!(payload.wifi_password.is_empty());
    }

    #[test]
    fn test_mode_switch_request_wire_strings() {
        let req = ModeSwitchRequest {
            mode: "station".to_string(),
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"mode":"station"}"#);
    }

    #[test]
    fn test_mode_switch_ack_optional_message() {
        let ack: ModeSwitchAck = serde_json::from_str("{}").unwrap();
        assert!(ack.message.is_none());

        let ack: ModeSwitchAck =
            serde_json::from_str(r#"{"message": "switching to station"}"#).unwrap();
        assert_eq!(ack.message.as_deref(), Some("switching to station"));
    }
}

//! Network status model.
//!
//! [`NetworkSnapshot`] is the console's best-known view of the device's
//! network state, rebuilt wholesale from each successful poll. The
//! mode-specific field groups are mutually exclusive by construction:
//! normalization only populates the group matching the active mode, so
//! fields of the inactive mode are absent rather than stale.

use crate::models::RawNetworkStatus;

/// The device's network mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkMode {
    /// Joined an existing WiFi network as a client
    Station,
    /// Broadcasting its own configuration network
    AccessPoint,
    /// Mid-transition between modes
    Switching,
    /// No status received yet, or unrecognized wire value
    #[default]
    Unknown,
}

impl NetworkMode {
    /// Parse the wire representation reported by the device.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "station" | "sta" => NetworkMode::Station,
            "ap" | "access_point" => NetworkMode::AccessPoint,
            "switching" => NetworkMode::Switching,
            _ => NetworkMode::Unknown,
        }
    }
}

/// A mode the operator can ask the device to switch into.
///
/// Narrower than [`NetworkMode`]: `Switching` and `Unknown` are observed
/// states, not requestable targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchTarget {
    Station,
    AccessPoint,
}

impl SwitchTarget {
    /// Wire string used by `POST /api/v1/network/mode`.
    pub fn wire_str(&self) -> &'static str {
        match self {
            SwitchTarget::Station => "station",
            SwitchTarget::AccessPoint => "ap",
        }
    }

    /// The mode this target resolves to once the switch completes.
    pub fn as_mode(&self) -> NetworkMode {
        match self {
            SwitchTarget::Station => NetworkMode::Station,
            SwitchTarget::AccessPoint => NetworkMode::AccessPoint,
        }
    }
}

/// Station link status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationStatus {
    Connected,
    #[default]
    Disconnected,
}

impl StationStatus {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(s) if s.trim().eq_ignore_ascii_case("connected") => StationStatus::Connected,
            _ => StationStatus::Disconnected,
        }
    }
}

/// Station-mode detail, present only when the snapshot mode is Station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDetail {
    /// SSID the device is joined to (or attempting)
    pub ssid: String,
    /// Link status
    pub status: StationStatus,
    /// Assigned IP address, once connected
    pub ip_address: Option<String>,
    /// Signal strength in dBm
    pub rssi: Option<i32>,
}

/// Access-point detail, present only when the snapshot mode is AccessPoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPointDetail {
    /// SSID the device is broadcasting
    pub ssid: String,
    /// Address the device serves on its own network
    pub ip_address: Option<String>,
}

/// Immutable snapshot of the device's network state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkSnapshot {
    /// Active network mode
    pub mode: NetworkMode,
    /// Whether WiFi credentials are stored on the device
    pub is_provisioned: bool,
    /// Station detail; `Some` only when `mode == Station`
    pub station: Option<StationDetail>,
    /// Access-point detail; `Some` only when `mode == AccessPoint`
    pub access_point: Option<AccessPointDetail>,
}

impl NetworkSnapshot {
    /// The sentinel snapshot returned before any poll has succeeded.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Normalize a raw status payload into a snapshot.
    ///
    /// Fields belonging to the inactive mode are dropped here, never
    /// defaulted: an AP-mode payload that still carries stale `sta_*`
    /// values yields a snapshot with no station detail at all.
    pub fn from_raw(raw: &RawNetworkStatus) -> Self {
        let mode = NetworkMode::parse(&raw.mode);

        let station = match mode {
            NetworkMode::Station => raw.sta_ssid.as_ref().map(|ssid| StationDetail {
                ssid: ssid.clone(),
                status: StationStatus::parse(raw.sta_status.as_deref()),
                ip_address: raw.sta_ip_address.clone(),
                rssi: raw.sta_rssi,
            }),
            _ => None,
        };

        let access_point = match mode {
            NetworkMode::AccessPoint => raw.ap_ssid.as_ref().map(|ssid| AccessPointDetail {
                ssid: ssid.clone(),
                ip_address: raw.ap_ip_address.clone(),
            }),
            _ => None,
        };

        Self {
            mode,
            is_provisioned: raw.is_provisioned,
            station,
            access_point,
        }
    }

    /// True when the station interface reports a live connection.
    pub fn is_station_connected(&self) -> bool {
        self.station
            .as_ref()
            .map(|s| s.status == StationStatus::Connected)
            .unwrap_or(false)
    }
}

/// The console's retained device state.
///
/// Each field is replaced wholesale on a successful fetch and retained
/// untouched on failure, so the view keeps showing last-known-good data
/// while the device is unreachable.
#[derive(Debug, Default)]
pub struct StatusModel {
    snapshot: Option<NetworkSnapshot>,
    system: Option<crate::models::SystemInfo>,
    sensor: Option<crate::models::SensorReading>,
}

impl StatusModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a raw network payload from a successful poll.
    ///
    /// Returns the normalized snapshot that is now current.
    pub fn apply(&mut self, raw: &RawNetworkStatus) -> NetworkSnapshot {
        let snapshot = NetworkSnapshot::from_raw(raw);
        self.snapshot = Some(snapshot.clone());
        snapshot
    }

    /// The latest snapshot, or the Unknown sentinel if none was ever
    /// received.
    pub fn current(&self) -> NetworkSnapshot {
        self.snapshot.clone().unwrap_or_else(NetworkSnapshot::unknown)
    }

    /// True once at least one poll has produced a snapshot.
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Replace the retained system info.
    pub fn set_system(&mut self, info: crate::models::SystemInfo) {
        self.system = Some(info);
    }

    /// Replace the retained sensor reading.
    pub fn set_sensor(&mut self, reading: crate::models::SensorReading) {
        self.sensor = Some(reading);
    }

    /// Last-known system info.
    pub fn system(&self) -> Option<&crate::models::SystemInfo> {
        self.system.as_ref()
    }

    /// Last-known sensor reading.
    pub fn sensor(&self) -> Option<&crate::models::SensorReading> {
        self.sensor.as_ref()
    }
}

//! Network panel projection.
//!
//! Pure function of the current [`NetworkSnapshot`]: no state of its own.
//! The renderer binds these fields directly; visibility flags follow the
//! mode-exclusivity invariant, so a station snapshot never projects AP
//! fields and vice versa.

use crate::status::{NetworkMode, NetworkSnapshot, StationStatus};

/// Everything the network panel needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkViewState {
    /// Mode badge text
    pub badge_text: String,
    /// Style class for the badge
    pub badge_class: String,
    /// Human connection-status sentence
    pub status_sentence: String,
    /// Whether to show the SSID row
    pub show_ssid: bool,
    /// Whether to show the IP row
    pub show_ip: bool,
    /// Whether to show the RSSI row
    pub show_rssi: bool,
    /// SSID text when shown
    pub ssid_text: Option<String>,
    /// IP text when shown
    pub ip_text: Option<String>,
    /// Formatted RSSI when shown, e.g. `-55 dBm`
    pub rssi_text: Option<String>,
    /// Whether the switch-to-station control is enabled
    pub can_switch_to_station: bool,
    /// Label for the switch-to-station control
    pub switch_to_station_label: String,
    /// Hint shown on the disabled switch-to-station control
    pub switch_to_station_hint: Option<String>,
    /// Whether the switch-to-access-point control is enabled
    pub can_switch_to_ap: bool,
    /// Label for the switch-to-access-point control
    pub switch_to_ap_label: String,
}

impl NetworkViewState {
    /// Project a snapshot into the panel state.
    pub fn project(snapshot: &NetworkSnapshot) -> Self {
        let (badge_text, badge_class) = match snapshot.mode {
            NetworkMode::Station => ("Station", "badge-station"),
            NetworkMode::AccessPoint => ("Access Point", "badge-ap"),
            NetworkMode::Switching => ("Switching…", "badge-switching"),
            NetworkMode::Unknown => ("Unknown", "badge-unknown"),
        };

        let status_sentence = match (snapshot.mode, &snapshot.station, &snapshot.access_point) {
            (NetworkMode::Station, Some(station), _) => match station.status {
                StationStatus::Connected => format!("Connected to {}", station.ssid),
                StationStatus::Disconnected => format!("Not connected to {}", station.ssid),
            },
            (NetworkMode::Station, None, _) => "Station mode".to_string(),
            (NetworkMode::AccessPoint, _, Some(ap)) => {
                format!("Broadcasting access point {}", ap.ssid)
            }
            (NetworkMode::AccessPoint, _, None) => "Access-point mode".to_string(),
            (NetworkMode::Switching, _, _) => "Changing network mode…".to_string(),
            (NetworkMode::Unknown, _, _) => "Device status unknown".to_string(),
        };

        let (ssid_text, ip_text, rssi_text) = match snapshot.mode {
            NetworkMode::Station => {
                let station = snapshot.station.as_ref();
                (
                    station.map(|s| s.ssid.clone()),
                    station.and_then(|s| s.ip_address.clone()),
                    station
                        .and_then(|s| s.rssi)
                        .map(|rssi| format!("{} dBm", rssi)),
                )
            }
            NetworkMode::AccessPoint => {
                let ap = snapshot.access_point.as_ref();
                (
                    ap.map(|a| a.ssid.clone()),
                    ap.and_then(|a| a.ip_address.clone()),
                    None,
                )
            }
            _ => (None, None, None),
        };

        let can_switch_to_station =
            snapshot.mode == NetworkMode::AccessPoint && snapshot.is_provisioned;
        let switch_to_station_hint = (snapshot.mode == NetworkMode::AccessPoint
            && !snapshot.is_provisioned)
            .then(|| "configure WiFi first".to_string());
        let can_switch_to_ap = snapshot.mode == NetworkMode::Station;

        let (switch_to_station_label, switch_to_ap_label) =
            if snapshot.mode == NetworkMode::Switching {
                ("Switching…".to_string(), "Switching…".to_string())
            } else {
                (
                    "Switch to WiFi network".to_string(),
                    "Switch to setup mode".to_string(),
                )
            };

        Self {
            badge_text: badge_text.to_string(),
            badge_class: badge_class.to_string(),
            status_sentence,
            show_ssid: ssid_text.is_some(),
            show_ip: ip_text.is_some(),
            show_rssi: rssi_text.is_some(),
            ssid_text,
            ip_text,
            rssi_text,
            can_switch_to_station,
            switch_to_station_label,
            switch_to_station_hint,
            can_switch_to_ap,
            switch_to_ap_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawNetworkStatus;

    fn project_raw(raw: RawNetworkStatus) -> NetworkViewState {
        NetworkViewState::project(&NetworkSnapshot::from_raw(&raw))
    }

    #[test]
    fn test_connected_station_projection() {
        let view = project_raw(RawNetworkStatus {
            mode: "station".to_string(),
            is_provisioned: true,
            sta_ssid: Some("HomeNet".to_string()),
            sta_status: Some("connected".to_string()),
            sta_ip_address: Some("192.168.1.42".to_string()),
            sta_rssi: Some(-55),
            ..Default::default()
        });

        assert_eq!(view.badge_text, "Station");
        assert_eq!(view.badge_class, "badge-station");
        assert_eq!(view.status_sentence, "Connected to HomeNet");
        assert_eq!(view.rssi_text.as_deref(), Some("-55 dBm"));
        assert!(view.show_ssid && view.show_ip && view.show_rssi);
        assert!(view.can_switch_to_ap);
        assert!(!view.can_switch_to_station);
    }

    #[test]
    fn test_disconnected_station_projection() {
        let view = project_raw(RawNetworkStatus {
            mode: "station".to_string(),
            is_provisioned: true,
            sta_ssid: Some("HomeNet".to_string()),
            sta_status: Some("disconnected".to_string()),
            ..Default::default()
        });

        assert_eq!(view.status_sentence, "Not connected to HomeNet");
        assert!(view.show_ssid);
        assert!(!view.show_ip);
        assert!(!view.show_rssi);
    }

    #[test]
    fn test_station_projection_has_no_ap_fields() {
        let view = project_raw(RawNetworkStatus {
            mode: "station".to_string(),
            is_provisioned: true,
            sta_ssid: Some("HomeNet".to_string()),
            sta_status: Some("connected".to_string()),
            // Stale AP fields must not leak into the projection
            ap_ssid: Some("EnviLog".to_string()),
            ap_ip_address: Some("192.168.4.1".to_string()),
            ..Default::default()
        });

        assert_eq!(view.ssid_text.as_deref(), Some("HomeNet"));
        assert_ne!(view.ip_text.as_deref(), Some("192.168.4.1"));
    }

    #[test]
    fn test_ap_projection() {
        let view = project_raw(RawNetworkStatus {
            mode: "ap".to_string(),
            is_provisioned: true,
            ap_ssid: Some("EnviLog".to_string()),
            ap_ip_address: Some("192.168.4.1".to_string()),
            // Stale station fields must not leak either
            sta_ssid: Some("HomeNet".to_string()),
            sta_rssi: Some(-60),
            ..Default::default()
        });

        assert_eq!(view.badge_text, "Access Point");
        assert_eq!(view.status_sentence, "Broadcasting access point EnviLog");
        assert_eq!(view.ssid_text.as_deref(), Some("EnviLog"));
        assert_eq!(view.ip_text.as_deref(), Some("192.168.4.1"));
        assert!(!view.show_rssi);
        assert!(view.can_switch_to_station);
        assert!(view.switch_to_station_hint.is_none());
        assert!(!view.can_switch_to_ap);
    }

    #[test]
    fn test_unprovisioned_ap_disables_station_switch_with_hint() {
        let view = project_raw(RawNetworkStatus {
            mode: "ap".to_string(),
            is_provisioned: false,
            ap_ssid: Some("EnviLog".to_string()),
            ..Default::default()
        });

        assert!(!view.can_switch_to_station);
        assert_eq!(
            view.switch_to_station_hint.as_deref(),
            Some("configure WiFi first")
        );
    }

    #[test]
    fn test_unknown_projection() {
        let view = NetworkViewState::project(&NetworkSnapshot::unknown());
        assert_eq!(view.badge_text, "Unknown");
        assert_eq!(view.status_sentence, "Device status unknown");
        assert!(!view.show_ssid && !view.show_ip && !view.show_rssi);
        assert!(!view.can_switch_to_station && !view.can_switch_to_ap);
    }

    #[test]
    fn test_switching_projection() {
        let view = project_raw(RawNetworkStatus {
            mode: "switching".to_string(),
            ..Default::default()
        });
        assert_eq!(view.badge_text, "Switching…");
        assert_eq!(view.status_sentence, "Changing network mode…");
        assert_eq!(view.switch_to_station_label, "Switching…");
        assert_eq!(view.switch_to_ap_label, "Switching…");
        assert!(!view.can_switch_to_station && !view.can_switch_to_ap);
    }

    #[test]
    fn test_switch_control_labels() {
        let view = project_raw(RawNetworkStatus {
            mode: "ap".to_string(),
            is_provisioned: true,
            ap_ssid: Some("EnviLog".to_string()),
            ..Default::default()
        });
        assert_eq!(view.switch_to_station_label, "Switch to WiFi network");
        assert_eq!(view.switch_to_ap_label, "Switch to setup mode");
    }
}

//! View-state projections consumed by the rendering collaborator.
//!
//! Everything here is a pure function of controller-owned state: the
//! renderer can rebuild its whole surface from a [`ConsoleViewState`]
//! without access to the controller internals.

mod modal_view;
mod network_view;

pub use modal_view::{ModalViewState, ReconnectPath};
pub use network_view::NetworkViewState;

use crate::models::{SensorReading, SystemInfo};

/// Complete view state for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleViewState {
    /// Network panel projection
    pub network: NetworkViewState,
    /// Guidance modal projection
    pub modal: ModalViewState,
    /// Last-known system info
    pub system: Option<SystemInfo>,
    /// Last-known sensor reading
    pub sensor: Option<SensorReading>,
    /// Whether the status poller is currently scheduled
    pub poller_running: bool,
    /// Whether the credential/config forms accept a submission (false
    /// while a transition is pending)
    pub forms_enabled: bool,
    /// Prefill for the WiFi credential form (stored SSID)
    pub wifi_form_ssid: String,
    /// Prefill for the MQTT form (stored broker URL)
    pub mqtt_broker_url: String,
    /// Transient notice from a non-modal operation (e.g. MQTT save)
    pub notice: Option<String>,
}

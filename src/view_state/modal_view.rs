//! Guidance modal projection.
//!
//! Pure function of the [`GuidanceState`] and console configuration. The
//! dual-path screen deliberately gives both reconnection routes equal
//! weight: the operator cannot know whether the device joined the target
//! network or fell back to its own access point, and the modal must not
//! commit to either.

use crate::config::ConsoleConfig;
use crate::guidance::GuidanceState;

/// One reconnection route offered by the dual-path screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPath {
    /// Short label for the route
    pub title: String,
    /// Network to join
    pub ssid: String,
    /// Passphrase, when the console knows it (fallback AP only)
    pub passphrase: Option<String>,
    /// Address to browse to after joining
    pub url: String,
}

/// Everything the modal needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalViewState {
    /// Whether the modal is shown at all
    pub visible: bool,
    /// Whether navigation away from the page must be blocked
    pub blocking: bool,
    /// Modal title
    pub title: String,
    /// Body text
    pub body: String,
    /// Reconnection routes (empty outside AwaitingReconnect)
    pub paths: Vec<ReconnectPath>,
    /// Label for the acknowledgement button, when offered
    pub confirm_label: Option<String>,
    /// Label for the dismiss/retry button, when offered
    pub dismiss_label: Option<String>,
}

impl ModalViewState {
    /// Project a guidance state into modal content.
    pub fn project(state: &GuidanceState, config: &ConsoleConfig) -> Self {
        match state {
            GuidanceState::Hidden => Self::default(),

            GuidanceState::Loading { message } => Self {
                visible: true,
                blocking: true,
                title: "Please wait".to_string(),
                body: message.clone(),
                ..Self::default()
            },

            GuidanceState::AwaitingReconnect {
                target_ssid,
                fallback_ssid,
            } => {
                let mut paths = Vec::new();

                if let Some(target) = target_ssid {
                    if target != fallback_ssid {
                        paths.push(ReconnectPath {
                            title: "Join your WiFi network".to_string(),
                            ssid: target.clone(),
                            passphrase: None,
                            url: format!("http://{}", config.device_hostname),
                        });
                    }
                }
                paths.push(ReconnectPath {
                    title: "Join the device's own network".to_string(),
                    ssid: fallback_ssid.clone(),
                    passphrase: Some(config.fallback_ap.passphrase.clone()),
                    url: format!("http://{}", config.fallback_ap.address),
                });

                Self {
                    visible: true,
                    blocking: true,
                    title: "Reconnect to your device".to_string(),
                    body: "The device is applying the new network settings and may have \
                           left this network. Reconnect using either option below, then \
                           confirm."
                        .to_string(),
                    paths,
                    confirm_label: Some("I've reconnected".to_string()),
                    dismiss_label: None,
                }
            }

            GuidanceState::Succeeded { ssid, ip } => {
                let body = match ip {
                    Some(ip) => format!("The device is connected to {} at {}.", ssid, ip),
                    None => format!("The device is connected to {}.", ssid),
                };
                Self {
                    visible: true,
                    blocking: false,
                    title: "Device connected".to_string(),
                    body,
                    dismiss_label: Some("Done".to_string()),
                    ..Self::default()
                }
            }

            GuidanceState::Failed { message, retryable } => Self {
                visible: true,
                blocking: false,
                title: "Update failed".to_string(),
                body: message.clone(),
                dismiss_label: Some(if *retryable {
                    "Try again".to_string()
                } else {
                    "Close".to_string()
                }),
                ..Self::default()
            },
        }
    }
}

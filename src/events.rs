//! Message types connecting the renderer, background tasks and controller.
//!
//! The renderer never calls component methods directly: it sends a
//! [`UserAction`] through [`crate::controller::ConsoleController::dispatch`].
//! Background tasks (the poller, submission tasks) report back through
//! [`ConsoleEvent`] on the controller's mpsc channel, so every piece of
//! shared state has exactly one writer.

use uuid::Uuid;

use crate::models::{
    MqttConfigPayload, NetworkConfigPayload, RawNetworkStatus, SensorReading, SystemInfo,
};
use crate::status::SwitchTarget;
use crate::transition::TransitionOutcome;

/// An operator intent dispatched by the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// The console view became active: start polling, load config forms
    ViewOpened,
    /// The console view was torn down: stop polling
    ViewClosed,
    /// Manual refresh; also restarts a stopped poller
    RefreshNow,
    /// Submit WiFi credentials from the form
    SubmitCredentials { ssid: String, password: String },
    /// Request a network mode switch
    SwitchMode { target: SwitchTarget },
    /// Submit the MQTT broker configuration
    SubmitMqttConfig { broker_url: String },
    /// The operator confirmed they reconnected after a network change
    AcknowledgeReconnected,
    /// Dismiss a terminal guidance modal (failure or success confirmation)
    DismissGuidance,
}

/// An event produced by a background task, applied by the controller.
#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    /// Fresh system info from a poll tick
    SystemUpdated(SystemInfo),
    /// Fresh raw network status from a poll tick
    NetworkFetched(RawNetworkStatus),
    /// Fresh sensor reading from a poll tick
    SensorUpdated(SensorReading),
    /// The poller crossed its failure threshold and stopped itself
    PollerStopped { consecutive_failures: u32 },
    /// A transition submission resolved with a classified outcome
    TransitionResolved { id: Uuid, outcome: TransitionOutcome },
    /// Stored network config fetched (form prefill)
    NetworkConfigLoaded(NetworkConfigPayload),
    /// Stored MQTT config fetched (form prefill)
    MqttConfigLoaded(MqttConfigPayload),
    /// MQTT config submission finished
    MqttConfigSaved { error: Option<String> },
}

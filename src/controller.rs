//! Top-level console controller.
//!
//! Owns all mutable state (status model, poller, in-flight transition,
//! guidance flow) and is the single writer for each piece. The renderer
//! talks to it through exactly two seams: [`ConsoleController::dispatch`]
//! for operator intents and [`ConsoleController::view`] for projections.
//! Background work reports back as [`ConsoleEvent`]s which the host loop
//! feeds into [`ConsoleController::handle_event`].

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::ConsoleConfig;
use crate::device::DeviceClient;
use crate::events::{ConsoleEvent, UserAction};
use crate::guidance::{GuidanceFlow, NavigationLock, NoopNavigationLock};
use crate::models::{MqttConfigPayload, NetworkConfigPayload};
use crate::poller::StatusPoller;
use crate::status::{StatusModel, SwitchTarget};
use crate::traits::HttpClient;
use crate::transition::{TransitionController, TransitionError, TransitionOutcome};
use crate::view_state::{ConsoleViewState, ModalViewState, NetworkViewState};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// The console controller.
pub struct ConsoleController {
    config: ConsoleConfig,
    client: Arc<DeviceClient>,
    status: StatusModel,
    poller: StatusPoller,
    transitions: TransitionController,
    guidance: GuidanceFlow,
    events_tx: mpsc::Sender<ConsoleEvent>,
    events_rx: mpsc::Receiver<ConsoleEvent>,
    wifi_form: NetworkConfigPayload,
    mqtt_form: MqttConfigPayload,
    notice: Option<String>,
}

impl ConsoleController {
    /// Create a controller with the production HTTP transport and no
    /// navigation lock.
    pub fn new(config: ConsoleConfig) -> Self {
        let client = Arc::new(DeviceClient::new(&config));
        Self::assemble(config, client, Box::new(NoopNavigationLock))
    }

    /// Create a controller over caller-provided seams. The renderer
    /// passes its navigation lock here; tests inject a mock transport.
    pub fn with_parts(
        config: ConsoleConfig,
        http: Arc<dyn HttpClient>,
        lock: Box<dyn NavigationLock>,
    ) -> Self {
        let client = Arc::new(DeviceClient::with_http_client(&config, http));
        Self::assemble(config, client, lock)
    }

    fn assemble(
        config: ConsoleConfig,
        client: Arc<DeviceClient>,
        lock: Box<dyn NavigationLock>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let poller = StatusPoller::new(Arc::clone(&client), &config, events_tx.clone());

        Self {
            config,
            client,
            status: StatusModel::new(),
            poller,
            transitions: TransitionController::new(),
            guidance: GuidanceFlow::new(lock),
            events_tx,
            events_rx,
            wifi_form: NetworkConfigPayload::default(),
            mqtt_form: MqttConfigPayload::default(),
            notice: None,
        }
    }

    /// Dispatch an operator intent.
    ///
    /// Validation failures (empty credentials, ineligible switch, a
    /// transition already in progress) are returned for inline display;
    /// no network call has been made in that case.
    pub fn dispatch(&mut self, action: UserAction) -> Result<(), TransitionError> {
        tracing::debug!(?action, "dispatch");
        match action {
            UserAction::ViewOpened => {
                self.poller.start();
                self.load_config_forms();
                Ok(())
            }
            UserAction::ViewClosed => {
                self.poller.stop();
                Ok(())
            }
            UserAction::RefreshNow => {
                self.poller.start();
                Ok(())
            }
            UserAction::SubmitCredentials { ssid, password } => {
                self.submit_credentials(&ssid, &password)
            }
            UserAction::SwitchMode { target } => self.switch_mode(target),
            UserAction::SubmitMqttConfig { broker_url } => {
                self.submit_mqtt_config(&broker_url);
                Ok(())
            }
            UserAction::AcknowledgeReconnected => {
                if self.guidance.acknowledge_reconnected() {
                    // Resuming the poller is an explicit follow-up of the
                    // acknowledgement, never a side effect of polling.
                    self.poller.start();
                }
                Ok(())
            }
            UserAction::DismissGuidance => {
                if self.guidance.dismiss() && self.guidance.is_settled() {
                    self.transitions.discard();
                }
                Ok(())
            }
        }
    }

    /// Apply a background event to the owned state.
    pub fn handle_event(&mut self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::SystemUpdated(info) => self.status.set_system(info),
            ConsoleEvent::NetworkFetched(raw) => {
                let snapshot = self.status.apply(&raw);
                self.guidance.on_snapshot(&snapshot);
                // A post-acknowledgement confirmation that stood down
                // leaves the flow settled with the request still owned.
                if self.guidance.is_settled() && !self.transitions.is_pending() {
                    self.transitions.discard();
                }
            }
            ConsoleEvent::SensorUpdated(reading) => self.status.set_sensor(reading),
            ConsoleEvent::PollerStopped {
                consecutive_failures,
            } => {
                // Not a user-facing error: the guidance flow or a manual
                // refresh restarts polling.
                tracing::debug!(consecutive_failures, "poller exhausted");
            }
            ConsoleEvent::TransitionResolved { id, outcome } => {
                if let Some(request) = self.transitions.resolve(id, outcome) {
                    self.guidance.on_outcome(&request, &self.config.fallback_ap);
                }
            }
            ConsoleEvent::NetworkConfigLoaded(payload) => self.wifi_form = payload,
            ConsoleEvent::MqttConfigLoaded(payload) => self.mqtt_form = payload,
            ConsoleEvent::MqttConfigSaved { error } => {
                self.notice = Some(match error {
                    None => "MQTT settings saved".to_string(),
                    Some(message) => message,
                });
            }
        }
    }

    /// Receive the next background event. The host's event loop awaits
    /// this and feeds the result to [`Self::handle_event`].
    pub async fn next_event(&mut self) -> Option<ConsoleEvent> {
        self.events_rx.recv().await
    }

    /// Apply all events that are already queued, without waiting.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Project the current state for rendering.
    pub fn view(&self) -> ConsoleViewState {
        ConsoleViewState {
            network: NetworkViewState::project(&self.status.current()),
            modal: ModalViewState::project(self.guidance.state(), &self.config),
            system: self.status.system().cloned(),
            sensor: self.status.sensor().cloned(),
            poller_running: self.poller.is_running(),
            forms_enabled: !self.transitions.is_pending(),
            wifi_form_ssid: self.wifi_form.wifi_ssid.clone(),
            mqtt_broker_url: self.mqtt_form.broker_url.clone(),
            notice: self.notice.clone(),
        }
    }

    fn submit_credentials(&mut self, ssid: &str, password: &str) -> Result<(), TransitionError> {
        let (id, creds) = self.transitions.begin_credential_update(ssid, password)?;
        self.guidance
            .on_submitted(&crate::transition::TransitionKind::CredentialUpdate {
                ssid: creds.ssid.clone(),
            });

        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let payload = NetworkConfigPayload {
                wifi_ssid: creds.ssid,
                wifi_password: creds.password,
            };
            let result = client.submit_network_config(&payload).await;
            let outcome = TransitionOutcome::classify(&result);
            let _ = events
                .send(ConsoleEvent::TransitionResolved { id, outcome })
                .await;
        });
        Ok(())
    }

    fn switch_mode(&mut self, target: SwitchTarget) -> Result<(), TransitionError> {
        let current = self.status.current();
        let expected_ssid = match target {
            // The stored config names the network a station switch joins
            SwitchTarget::Station => {
                let ssid = self.wifi_form.wifi_ssid.trim();
                (!ssid.is_empty()).then(|| ssid.to_string())
            }
            SwitchTarget::AccessPoint => Some(self.config.fallback_ap.ssid.clone()),
        };

        let id = self
            .transitions
            .begin_mode_switch(target, &current, expected_ssid.clone())?;
        self.guidance
            .on_submitted(&crate::transition::TransitionKind::ModeSwitch {
                target,
                expected_ssid,
            });

        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.switch_mode(target).await;
            let outcome = TransitionOutcome::classify(&result);
            let _ = events
                .send(ConsoleEvent::TransitionResolved { id, outcome })
                .await;
        });
        Ok(())
    }

    fn submit_mqtt_config(&mut self, broker_url: &str) {
        let broker_url = broker_url.trim().to_string();
        if broker_url.is_empty() {
            self.notice = Some("broker URL is required".to_string());
            return;
        }

        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let payload = MqttConfigPayload { broker_url };
            let error = client
                .submit_mqtt_config(&payload)
                .await
                .err()
                .map(|e| e.to_string());
            let _ = events.send(ConsoleEvent::MqttConfigSaved { error }).await;
        });
    }

    fn load_config_forms(&self) {
        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let (network, mqtt) =
                tokio::join!(client.fetch_network_config(), client.fetch_mqtt_config());
            if let Ok(payload) = network {
                let _ = events.send(ConsoleEvent::NetworkConfigLoaded(payload)).await;
            }
            if let Ok(payload) = mqtt {
                let _ = events.send(ConsoleEvent::MqttConfigLoaded(payload)).await;
            }
        });
    }
}

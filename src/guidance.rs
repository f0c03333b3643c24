//! Reconnection guidance flow.
//!
//! A modal state machine that takes over the UI while a credential or
//! mode-switch request is in flight. The device may drop the browser's
//! connection as a side effect of success, so the flow never treats a
//! transport drop as failure: it presents two equally-weighted reconnection
//! paths and waits for the operator to say they are back.
//!
//! Navigation blocking is an explicit capability: the flow engages the
//! [`NavigationLock`] on entering a blocking state and releases it on every
//! terminal transition, so engage/release always pair.

use crate::config::FallbackAp;
use crate::status::NetworkSnapshot;
use crate::transition::{TransitionKind, TransitionOutcome, TransitionRequest};

/// The modal's state. Exactly one holds at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuidanceState {
    /// No modal shown
    #[default]
    Hidden,
    /// A request is in flight
    Loading {
        /// Progress message shown in the modal
        message: String,
    },
    /// The request probably succeeded and the device may have changed
    /// networks; the operator must reconnect by one of two paths
    AwaitingReconnect {
        /// SSID of the network named in the request, when known
        target_ssid: Option<String>,
        /// SSID of the device's own fallback access point
        fallback_ssid: String,
    },
    /// The change was confirmed by a poll after the operator reconnected
    Succeeded {
        /// Network the device ended up on
        ssid: String,
        /// Address it is reachable at
        ip: Option<String>,
    },
    /// The device rejected the request with a structured message
    Failed {
        /// Rejection message, surfaced verbatim
        message: String,
        /// Whether the operator may retry
        retryable: bool,
    },
}

impl GuidanceState {
    /// True while the modal must block navigation away from the page.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            GuidanceState::Loading { .. } | GuidanceState::AwaitingReconnect { .. }
        )
    }

    /// True when the modal is visible at all.
    pub fn is_visible(&self) -> bool {
        !matches!(self, GuidanceState::Hidden)
    }
}

/// Capability to block accidental navigation (page unload, back button).
///
/// Implemented by the rendering collaborator. `engage` and `release` are
/// called in pairs by the guidance flow; implementations need not be
/// reentrant.
pub trait NavigationLock: Send + Sync {
    /// Start blocking navigation.
    fn engage(&self);
    /// Stop blocking navigation.
    fn release(&self);
}

/// No-op lock for hosts without a navigation concept (and for tests).
#[derive(Debug, Default)]
pub struct NoopNavigationLock;

impl NavigationLock for NoopNavigationLock {
    fn engage(&self) {}
    fn release(&self) {}
}

/// The guidance state machine.
pub struct GuidanceFlow {
    state: GuidanceState,
    lock: Box<dyn NavigationLock>,
    engaged: bool,
    /// Set after the operator acknowledges reconnection; the next
    /// successful poll decides whether to show the success confirmation.
    confirm_pending: bool,
}

impl Default for GuidanceFlow {
    fn default() -> Self {
        Self::new(Box::new(NoopNavigationLock))
    }
}

impl GuidanceFlow {
    /// Create a flow with the given navigation lock.
    pub fn new(lock: Box<dyn NavigationLock>) -> Self {
        Self {
            state: GuidanceState::Hidden,
            lock,
            engaged: false,
            confirm_pending: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> &GuidanceState {
        &self.state
    }

    /// True while the navigation lock is engaged.
    pub fn is_lock_engaged(&self) -> bool {
        self.engaged
    }

    fn set_state(&mut self, state: GuidanceState) {
        let should_block = state.is_blocking();
        if should_block && !self.engaged {
            self.lock.engage();
            self.engaged = true;
        } else if !should_block && self.engaged {
            self.lock.release();
            self.engaged = false;
        }
        tracing::debug!(?state, "guidance state change");
        self.state = state;
    }

    /// A transition request was submitted: show the loading modal.
    pub fn on_submitted(&mut self, kind: &TransitionKind) {
        let message = match kind {
            TransitionKind::CredentialUpdate { ssid } => {
                format!("Applying WiFi settings for \"{}\"…", ssid)
            }
            TransitionKind::ModeSwitch { target, .. } => {
                format!("Switching to {} mode…", target.wire_str())
            }
        };
        self.confirm_pending = false;
        self.set_state(GuidanceState::Loading { message });
    }

    /// The in-flight request resolved: leave Loading.
    ///
    /// `Acknowledged` and `AmbiguousDrop` both route to the dual-path
    /// reconnection screen; only a structured rejection reaches `Failed`.
    pub fn on_outcome(&mut self, request: &TransitionRequest, fallback: &FallbackAp) {
        match &request.outcome {
            TransitionOutcome::Acknowledged | TransitionOutcome::AmbiguousDrop => {
                self.set_state(GuidanceState::AwaitingReconnect {
                    target_ssid: request.kind.target_ssid().map(str::to_string),
                    fallback_ssid: fallback.ssid.clone(),
                });
            }
            TransitionOutcome::Rejected { message } => {
                self.set_state(GuidanceState::Failed {
                    message: message.clone(),
                    retryable: true,
                });
            }
            TransitionOutcome::Pending => {
                tracing::warn!(request = %request.id, "outcome handler called while pending");
            }
        }
    }

    /// The operator confirmed they reconnected.
    ///
    /// The only way out of `AwaitingReconnect`. The modal closes and the
    /// next successful poll may promote to the success confirmation.
    /// Returns false (and does nothing) from any other state.
    pub fn acknowledge_reconnected(&mut self) -> bool {
        if !matches!(self.state, GuidanceState::AwaitingReconnect { .. }) {
            return false;
        }
        self.confirm_pending = true;
        self.set_state(GuidanceState::Hidden);
        true
    }

    /// Dismiss a terminal modal (`Failed` or `Succeeded`).
    ///
    /// Returns false from any other state; in particular this never
    /// dismisses `AwaitingReconnect`, which requires an acknowledgement.
    pub fn dismiss(&mut self) -> bool {
        if !matches!(
            self.state,
            GuidanceState::Failed { .. } | GuidanceState::Succeeded { .. }
        ) {
            return false;
        }
        self.confirm_pending = false;
        self.set_state(GuidanceState::Hidden);
        true
    }

    /// Feed a fresh snapshot after a poll.
    ///
    /// Only consulted while a post-acknowledgement confirmation is
    /// pending: the first successful poll after the operator reconnects
    /// either confirms the change (station connected) or stands down
    /// silently. Never drives a transition out of `AwaitingReconnect`.
    pub fn on_snapshot(&mut self, snapshot: &NetworkSnapshot) {
        if !self.confirm_pending {
            return;
        }
        self.confirm_pending = false;

        if let Some(station) = snapshot.station.as_ref() {
            if snapshot.is_station_connected() {
                self.set_state(GuidanceState::Succeeded {
                    ssid: station.ssid.clone(),
                    ip: station.ip_address.clone(),
                });
            }
        }
    }

    /// True once the flow is done with the current request: the request
    /// may be discarded and new submissions accepted.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, GuidanceState::Hidden) && !self.confirm_pending
    }
}

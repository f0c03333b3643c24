//! Mode transition controller.
//!
//! Owns the single in-flight [`TransitionRequest`] and classifies its
//! outcome. The classification is deliberately asymmetric: accepting new
//! credentials may drop the very connection the request travelled on, so
//! every transport-level failure is [`TransitionOutcome::AmbiguousDrop`]
//! (a success-shaped path that routes to reconnection guidance), and only
//! a structured non-success response from the device is a real rejection.

use std::time::Instant;

use thiserror::Error;
use uuid::Uuid;

use crate::device::DeviceApiError;
use crate::status::{NetworkMode, NetworkSnapshot, SwitchTarget};

/// What the in-flight request is trying to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionKind {
    /// New WiFi credentials were submitted
    CredentialUpdate {
        /// SSID the device was asked to join
        ssid: String,
    },
    /// A mode switch was requested
    ModeSwitch {
        /// Requested mode
        target: SwitchTarget,
        /// SSID the device is expected to join afterwards, when known
        /// (stored config for a switch to station)
        expected_ssid: Option<String>,
    },
}

impl TransitionKind {
    /// The network the operator should look for after a disruptive change.
    pub fn target_ssid(&self) -> Option<&str> {
        match self {
            TransitionKind::CredentialUpdate { ssid } => Some(ssid),
            TransitionKind::ModeSwitch { expected_ssid, .. } => expected_ssid.as_deref(),
        }
    }
}

/// Classified result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Submitted, not yet resolved
    Pending,
    /// The device answered with a structured success
    Acknowledged,
    /// The transport failed; the expected side effect of a successful
    /// disruptive change, so treated as probable success
    AmbiguousDrop,
    /// The device answered with a structured error
    Rejected {
        /// Message surfaced verbatim to the operator
        message: String,
    },
}

impl TransitionOutcome {
    /// Classify a submission result.
    ///
    /// Anything other than a structured rejection folds into the success
    /// side: 2xx is `Acknowledged`, every transport failure (timeout,
    /// reset, DNS/TLS) is `AmbiguousDrop`.
    pub fn classify<T>(result: &Result<T, DeviceApiError>) -> Self {
        match result {
            Ok(_) => TransitionOutcome::Acknowledged,
            Err(DeviceApiError::Rejection { message, .. }) => TransitionOutcome::Rejected {
                message: message.clone(),
            },
            Err(_) => TransitionOutcome::AmbiguousDrop,
        }
    }

    /// True once the outcome is no longer pending.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, TransitionOutcome::Pending)
    }
}

/// A user-initiated change in flight.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    /// Request identity, echoed by the resolution event
    pub id: Uuid,
    /// What is being changed
    pub kind: TransitionKind,
    /// When the request was submitted
    pub submitted_at: Instant,
    /// Classified outcome
    pub outcome: TransitionOutcome,
}

impl TransitionRequest {
    fn new(kind: TransitionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            submitted_at: Instant::now(),
            outcome: TransitionOutcome::Pending,
        }
    }
}

/// Why a submission was refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("SSID is required")]
    EmptySsid,
    #[error("password is required")]
    EmptyPassword,
    #[error("configure WiFi first")]
    NotProvisioned,
    #[error("device is not in station mode")]
    NotInStationMode,
    #[error("transition already in progress")]
    AlreadyInProgress,
}

/// Trimmed, validated credentials ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCredentials {
    pub ssid: String,
    pub password: String,
}

/// Controller enforcing the single-flight transition invariant.
#[derive(Debug, Default)]
pub struct TransitionController {
    in_flight: Option<TransitionRequest>,
}

impl TransitionController {
    /// Create a controller with no request in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current request, resolved or not.
    pub fn in_flight(&self) -> Option<&TransitionRequest> {
        self.in_flight.as_ref()
    }

    /// True while a request is submitted but unresolved.
    pub fn is_pending(&self) -> bool {
        self.in_flight
            .as_ref()
            .map(|r| r.outcome == TransitionOutcome::Pending)
            .unwrap_or(false)
    }

    fn guard(&self) -> Result<(), TransitionError> {
        if self.is_pending() {
            return Err(TransitionError::AlreadyInProgress);
        }
        Ok(())
    }

    /// Validate and register a credential update.
    ///
    /// Fails fast with no network call when either field is empty after
    /// trimming, or while another request is pending. On success the
    /// request is Pending and the returned credentials are what the
    /// submission task must send.
    pub fn begin_credential_update(
        &mut self,
        ssid: &str,
        password: &str,
    ) -> Result<(Uuid, ValidatedCredentials), TransitionError> {
        self.guard()?;

        let ssid = ssid.trim();
        let password = password.trim();
        if ssid.is_empty() {
            return Err(TransitionError::EmptySsid);
        }
        if password.is_empty() {
            return Err(TransitionError::EmptyPassword);
        }

        let request = TransitionRequest::new(TransitionKind::CredentialUpdate {
            ssid: ssid.to_string(),
        });
        let id = request.id;
        tracing::info!(request = %id, ssid, "credential update submitted");
        self.in_flight = Some(request);

        Ok((
            id,
            ValidatedCredentials {
                ssid: ssid.to_string(),
                password: password.to_string(),
            },
        ))
    }

    /// Validate and register a mode switch.
    ///
    /// Switching to station requires stored credentials; the controller
    /// rejects client-side rather than sending a request the device would
    /// also reject. Switching to access point is only meaningful from
    /// station mode.
    pub fn begin_mode_switch(
        &mut self,
        target: SwitchTarget,
        current: &NetworkSnapshot,
        expected_ssid: Option<String>,
    ) -> Result<Uuid, TransitionError> {
        self.guard()?;

        match target {
            SwitchTarget::Station => {
                if !current.is_provisioned {
                    return Err(TransitionError::NotProvisioned);
                }
            }
            SwitchTarget::AccessPoint => {
                if current.mode != NetworkMode::Station {
                    return Err(TransitionError::NotInStationMode);
                }
            }
        }

        let request = TransitionRequest::new(TransitionKind::ModeSwitch {
            target,
            expected_ssid,
        });
        let id = request.id;
        tracing::info!(request = %id, target = target.wire_str(), "mode switch submitted");
        self.in_flight = Some(request);
        Ok(id)
    }

    /// Record the classified outcome for the request with the given id.
    ///
    /// Returns the updated request, or `None` when the id does not match
    /// the in-flight request (a stale resolution, ignored).
    pub fn resolve(&mut self, id: Uuid, outcome: TransitionOutcome) -> Option<TransitionRequest> {
        match self.in_flight.as_mut() {
            Some(request) if request.id == id => {
                tracing::info!(request = %id, ?outcome, "transition resolved");
                request.outcome = outcome;
                Some(request.clone())
            }
            _ => {
                tracing::warn!(request = %id, "resolution for unknown transition ignored");
                None
            }
        }
    }

    /// Discard the finished request, accepting new submissions again.
    pub fn discard(&mut self) {
        self.in_flight = None;
    }
}

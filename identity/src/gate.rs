//! Credential verification gate
//!
//! The gate is the only way to obtain a [`Session`]. Verification is a
//! request/complete pair so the host decides how the backend call is made.

use crate::{Credentials, Session};
use core_types::RequestId;
use services_logger::{LogLevel, Logger};
use services_notification::{ComponentScope, Notification, Notifier};
use thiserror::Error;

/// Errors that keep a session from being established
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// A required field was left blank
    #[error("Missing {0}")]
    Incomplete(&'static str),

    /// The backend refused the credentials
    #[error("Failed to verify credentials")]
    Rejected,

    /// The backend could not be asked
    #[error("Failed to verify credentials: {0}")]
    Unreachable(String),

    /// Fields are locked once verified
    #[error("Credentials are already verified")]
    AlreadyVerified,

    /// A verification is still in flight
    #[error("Verification already in progress")]
    VerificationPending,
}

/// What the backend said about a verification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Credentials accepted
    Verified,
    /// Credentials refused
    Rejected,
    /// The request itself failed
    Unreachable(String),
}

/// A verification the host must carry out
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    /// Correlates the request with its completion
    pub request_id: RequestId,
    /// Credentials to verify
    pub credentials: Credentials,
}

/// Gate state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Nothing submitted yet, or signed out
    Unverified,
    /// Waiting for the backend
    Verifying { request_id: RequestId },
    /// Session established
    Verified(Session),
    /// Last attempt failed
    Failed(CredentialError),
}

/// Drives credential verification
#[derive(Debug)]
pub struct CredentialGate {
    state: GateState,
    pending: Option<Credentials>,
    logger: Logger,
    notifier: Notifier,
}

impl CredentialGate {
    /// Creates an unverified gate
    pub fn new(logger: Logger, notifier: Notifier) -> Self {
        Self {
            state: GateState::Unverified,
            pending: None,
            logger: logger.for_component("credentials"),
            notifier,
        }
    }

    /// Current state
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// The established session, if verified
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            GateState::Verified(session) => Some(session),
            _ => None,
        }
    }

    /// Returns true once a session exists
    pub fn is_verified(&self) -> bool {
        self.session().is_some()
    }

    /// Whether the input fields accept edits
    pub fn fields_locked(&self) -> bool {
        matches!(
            self.state,
            GateState::Verified(_) | GateState::Verifying { .. }
        )
    }

    /// Submits credentials for verification
    pub fn begin(&mut self, credentials: Credentials) -> Result<VerificationRequest, CredentialError> {
        match self.state {
            GateState::Verified(_) => return Err(CredentialError::AlreadyVerified),
            GateState::Verifying { .. } => return Err(CredentialError::VerificationPending),
            GateState::Unverified | GateState::Failed(_) => {}
        }

        if let Some(field) = credentials.missing_field() {
            let error = CredentialError::Incomplete(field);
            self.fail(error.clone());
            return Err(error);
        }

        self.notifier.dismiss_scope(ComponentScope::Credentials);
        let request_id = RequestId::new();
        self.logger.log(
            self.logger
                .entry(LogLevel::Debug, "verifying credentials")
                .with_source(request_id)
                .with_field("fingerprint", credentials.fingerprint()),
        );

        self.state = GateState::Verifying { request_id };
        self.pending = Some(credentials.clone());
        Ok(VerificationRequest {
            request_id,
            credentials,
        })
    }

    /// Applies the backend's answer
    ///
    /// Answers for anything but the pending request are ignored.
    pub fn complete(&mut self, request_id: RequestId, outcome: VerificationOutcome) -> &GateState {
        let pending_id = match self.state {
            GateState::Verifying { request_id } => request_id,
            _ => {
                self.logger.debug("ignoring verification answer with nothing pending");
                return &self.state;
            }
        };
        if pending_id != request_id {
            self.logger.log(
                self.logger
                    .entry(LogLevel::Debug, "ignoring stale verification answer")
                    .with_source(request_id),
            );
            return &self.state;
        }

        let credentials = self.pending.take();
        match (outcome, credentials) {
            (VerificationOutcome::Verified, Some(credentials)) => {
                let session = Session::new(credentials);
                self.logger.log(
                    self.logger
                        .entry(LogLevel::Info, "credentials verified")
                        .with_source(request_id)
                        .with_field("session", session.id())
                        .with_field("fingerprint", session.fingerprint()),
                );
                self.state = GateState::Verified(session);
            }
            (VerificationOutcome::Verified, None) => {
                self.fail(CredentialError::Unreachable("no pending credentials".to_string()));
            }
            (VerificationOutcome::Rejected, _) => self.fail(CredentialError::Rejected),
            (VerificationOutcome::Unreachable(reason), _) => {
                self.fail(CredentialError::Unreachable(reason))
            }
        }
        &self.state
    }

    /// Drops the session so new credentials can be entered
    pub fn sign_out(&mut self) {
        if let GateState::Verified(session) = &self.state {
            self.logger.log(
                self.logger
                    .entry(LogLevel::Info, "signed out")
                    .with_field("session", session.id()),
            );
        }
        self.pending = None;
        self.state = GateState::Unverified;
    }

    fn fail(&mut self, error: CredentialError) {
        self.logger.warn(error.to_string());
        self.notifier.notify(Notification::error(
            ComponentScope::Credentials,
            error.to_string(),
        ));
        self.state = GateState::Failed(error);
    }
}

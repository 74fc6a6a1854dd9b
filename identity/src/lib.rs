//! # Identity
//!
//! This crate provides credential and session primitives for the browser.
//!
//! ## Philosophy
//!
//! - **Identity is explicit and contextual, not global**: A [`Session`] is a
//!   value handed to the components that need it
//! - **Verification gates everything**: No session exists until the backend
//!   has accepted the credentials
//! - **Secrets stay secret**: Debug output and logs only ever show a
//!   fingerprint of the access key
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - An identity provider integration
//! - A credential store (nothing is persisted)
//! - A signing implementation; requests are signed by the backend

pub mod gate;

pub use gate::{CredentialError, CredentialGate, GateState, VerificationOutcome, VerificationRequest};

use core_types::SessionId;
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of the hex fingerprint shown in logs
const FINGERPRINT_LEN: usize = 12;

/// An access key pair
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    /// Creates a credential pair
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// The access key ID
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret access key
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Returns the name of the first blank field, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.access_key_id.trim().is_empty() {
            Some("access key id")
        } else if self.secret_access_key.trim().is_empty() {
            Some("secret access key")
        } else {
            None
        }
    }

    /// Short SHA-256 fingerprint of the access key ID, safe to log
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.access_key_id.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(FINGERPRINT_LEN);
        digest
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}

/// A verified credential session
///
/// Sessions are created by [`CredentialGate`] and injected into every
/// component that talks to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    credentials: Credentials,
}

impl Session {
    /// Creates a session for credentials the backend accepted
    pub fn new(credentials: Credentials) -> Self {
        Self {
            id: SessionId::new(),
            credentials,
        }
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Credentials the session was verified with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Fingerprint of the session's access key
    pub fn fingerprint(&self) -> String {
        self.credentials.fingerprint()
    }
}

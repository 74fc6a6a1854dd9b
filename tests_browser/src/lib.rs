//! Browser Test Utilities
//!
//! Shared setup for end-to-end tests that run every component against the
//! simulated backend.
//!
//! ## Test Philosophy
//!
//! - **Real client, fake backend**: Components talk to [`BackendClient`] over
//!   the simulated transport, so the wire format is exercised too
//! - **Deterministic failures**: All faults are reproducible via `FaultPlan`
//! - **Explicit timing**: Out-of-order delivery is arranged with a
//!   `DeferredQueue`, never with threads

use identity::{CredentialError, CredentialGate, Credentials, GateState, Session};
use services_bucket_select::BucketSelector;
use services_logger::Logger;
use services_network::{verification_outcome, BackendClient, CredentialVerifier};
use services_notification::Notifier;
use services_object_browser::{Navigator, PreviewPane};
use services_settings::{create_default_registry, BrowserSettings};
use sim_backend::SimulatedBackend;
use std::sync::Arc;

pub const ACCESS_KEY: &str = "AKIAEXAMPLE";
pub const SECRET_KEY: &str = "wJalrXUtnFEMI";
pub const RESTRICTED_KEY: &str = "AKIARESTRICTED";

/// A backend with two buckets and a restricted account
pub fn sample_backend() -> SimulatedBackend {
    SimulatedBackend::new()
        .with_account(ACCESS_KEY, SECRET_KEY)
        .with_restricted_account(RESTRICTED_KEY, SECRET_KEY)
        .with_object("analytics", "a/b.txt", vec![b'b'; 100])
        .with_object("analytics", "a/c/d.txt", vec![b'd'; 50])
        .with_object("analytics", "e.txt", vec![b'e'; 10])
        .with_object("analytics", "reports/", Vec::new())
        .with_object("analytics", "reports/2024/sales.csv", "region,total\nnorth,10\nsouth,12\n")
        .with_object("analytics", "reports/2024/raw.tsv", "region\ttotal\nwest\t3\n")
        .with_object("analytics", "dumps/archive.gz", vec![0x1f, 0x8b, 0x08, 0x00, 0x00])
        .with_object("media", "cover.png", vec![0x89, b'P', b'N', b'G'])
}

/// Everything a browser session needs, wired to one simulated backend
pub struct TestHarness {
    pub backend: Arc<SimulatedBackend>,
    pub client: BackendClient<Arc<SimulatedBackend>>,
    pub settings: BrowserSettings,
    pub logger: Logger,
    pub notifier: Notifier,
}

/// Bootstrap helper for tests
///
/// Uses the default settings snapshot.
pub fn test_bootstrap(backend: SimulatedBackend) -> TestHarness {
    let settings = create_default_registry()
        .snapshot()
        .unwrap_or_default();
    bootstrap_with_settings(backend, settings)
}

/// Bootstrap helper with explicit settings
pub fn bootstrap_with_settings(backend: SimulatedBackend, settings: BrowserSettings) -> TestHarness {
    let backend = Arc::new(backend);
    let logger = Logger::with_limit("tests", settings.log_history_limit);
    let client = BackendClient::from_settings(Arc::clone(&backend), &settings, logger.clone());
    TestHarness {
        backend,
        client,
        settings,
        logger,
        notifier: Notifier::new(),
    }
}

impl TestHarness {
    /// A fresh credential gate
    pub fn gate(&self) -> CredentialGate {
        CredentialGate::new(self.logger.clone(), self.notifier.clone())
    }

    /// Runs a verification through `gate` against the backend
    pub fn verify(&self, gate: &mut CredentialGate, credentials: Credentials) -> Result<Session, CredentialError> {
        let request = gate.begin(credentials)?;
        let result = self.client.verify(&request.credentials);
        match gate.complete(request.request_id, verification_outcome(&result)) {
            GateState::Verified(session) => Ok(session.clone()),
            GateState::Failed(error) => Err(error.clone()),
            _ => Err(CredentialError::VerificationPending),
        }
    }

    /// Verifies the sample account
    pub fn sign_in(&self) -> Result<Session, CredentialError> {
        let mut gate = self.gate();
        self.verify(&mut gate, Credentials::new(ACCESS_KEY, SECRET_KEY))
    }

    /// A bucket selector sharing this harness's logger and notifier
    pub fn selector(&self) -> BucketSelector {
        BucketSelector::new(self.logger.clone(), self.notifier.clone())
    }

    /// A navigator for `session`
    pub fn navigator(&self, session: Session) -> Navigator {
        Navigator::new(session, self.logger.clone(), self.notifier.clone())
            .with_settings(&self.settings)
    }

    /// A preview pane for `session`
    pub fn preview_pane(&self, session: Session) -> PreviewPane {
        PreviewPane::new(session, self.logger.clone(), self.notifier.clone())
            .with_settings(&self.settings)
    }
}

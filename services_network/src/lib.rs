//! # Services Network
//!
//! The seam between the browser and the storage backend.
//!
//! ## Philosophy
//!
//! - **Collaborators are traits**: components depend on [`ListingSource`],
//!   [`PreviewSource`], [`BucketSource`] and [`CredentialVerifier`], never on a
//!   concrete client
//! - **Transport is pluggable**: [`BackendClient`] speaks the backend's JSON
//!   routes over any [`Transport`]
//! - **Every failure is a value**: non-success statuses, transport failures
//!   and undecodable bodies all become a [`FetchError`]
//!
//! ## Example
//!
//! ```ignore
//! let client = BackendClient::from_settings(transport, &settings, logger);
//! let entries = client.list_objects(&session, &bucket, "reports/")?;
//! ```

pub mod client;
pub mod protocol;
pub mod transport;

pub use client::BackendClient;
pub use protocol::{BackendRoute, BucketSummary, ObjectRecord, PreviewDocument};
pub use transport::{HttpReply, Transport, TransportError};

use core_types::BucketName;
use identity::{Credentials, Session, VerificationOutcome};
use object_view::ObjectEntry;
use thiserror::Error;

/// Errors from any backend call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// 401 from the backend
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403 from the backend
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Any other non-success status
    #[error("Backend returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The request never got an HTTP answer
    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The request body could not be built
    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// The success body was not what the route returns
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Classifies a non-success status
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            401 => FetchError::Unauthorized(detail),
            403 => FetchError::Forbidden(detail),
            _ => FetchError::Status { status, detail },
        }
    }

    /// Returns true when the backend refused the caller's credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Unauthorized(_))
    }
}

/// Maps a verification call's result onto the gate's vocabulary
pub fn verification_outcome(result: &Result<(), FetchError>) -> VerificationOutcome {
    match result {
        Ok(()) => VerificationOutcome::Verified,
        Err(FetchError::Unauthorized(_)) => VerificationOutcome::Rejected,
        Err(err) => VerificationOutcome::Unreachable(err.to_string()),
    }
}

/// Verifies an access key pair
pub trait CredentialVerifier {
    fn verify(&self, credentials: &Credentials) -> Result<(), FetchError>;
}

/// Enumerates the buckets visible to a key pair
pub trait BucketSource {
    fn list_buckets(&self, credentials: &Credentials) -> Result<Vec<BucketSummary>, FetchError>;
}

/// Lists objects under a prefix
///
/// Implementations return entries whose key begins with `prefix`, or every
/// object in the bucket when `prefix` is empty.
pub trait ListingSource {
    fn list_objects(
        &self,
        session: &Session,
        bucket: &BucketName,
        prefix: &str,
    ) -> Result<Vec<ObjectEntry>, FetchError>;
}

/// Fetches the head of an object as text
pub trait PreviewSource {
    fn preview(
        &self,
        session: &Session,
        bucket: &BucketName,
        key: &str,
    ) -> Result<PreviewDocument, FetchError>;
}

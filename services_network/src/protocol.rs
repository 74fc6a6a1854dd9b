//! Backend wire protocol
//!
//! Request and response bodies for the storage backend's JSON routes. Field
//! names follow the backend, which speaks camelCase.

use serde::{Deserialize, Serialize};

/// Routes exposed by the backend; every route is a `POST`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendRoute {
    VerifyCredentials,
    ListBuckets,
    ListBucketContents,
    QuickPreview,
}

impl BackendRoute {
    /// Path component of the route
    pub fn path(&self) -> &'static str {
        match self {
            BackendRoute::VerifyCredentials => "/verify-credentials",
            BackendRoute::ListBuckets => "/list-buckets",
            BackendRoute::ListBucketContents => "/list-bucket-contents",
            BackendRoute::QuickPreview => "/quick-preview",
        }
    }

    /// Full URL of the route under `base_url`
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }

    /// Resolves a route from its path
    pub fn from_path(path: &str) -> Option<Self> {
        [
            BackendRoute::VerifyCredentials,
            BackendRoute::ListBuckets,
            BackendRoute::ListBucketContents,
            BackendRoute::QuickPreview,
        ]
        .into_iter()
        .find(|route| route.path() == path)
    }
}

/// Body of `/verify-credentials` and `/list-buckets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsBody {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Body of `/list-bucket-contents`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketContentsBody {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    #[serde(default)]
    pub prefix: String,
}

/// Body of `/quick-preview`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewBody {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    pub file_name: String,
}

/// Reply of `/verify-credentials`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReply {
    pub message: String,
}

/// One bucket in a `/list-buckets` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub name: String,
    /// Total object size in GiB
    pub size: f64,
    pub files: u64,
}

/// Reply of `/list-buckets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketsReply {
    pub buckets: Vec<BucketSummary>,
}

/// One object in a `/list-bucket-contents` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub name: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
}

/// Reply of `/list-bucket-contents`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentsReply {
    pub contents: Vec<ObjectRecord>,
}

/// Reply of `/quick-preview`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    pub file_name: String,
    pub file_type: String,
    #[serde(default)]
    pub delimiter: Option<String>,
    pub preview_text: String,
    pub total_bytes: u64,
}

/// Error body the backend sends with any non-success status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub detail: String,
}

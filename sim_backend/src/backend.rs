//! In-memory backend
//!
//! Answers the backend's JSON routes from buckets held in memory, with
//! optional fault injection.

use crate::detect::{detect, preview_text};
use crate::fault_injection::{FaultAction, FaultInjector, FaultPlan};
use serde::de::DeserializeOwned;
use serde::Serialize;
use services_network::protocol::{
    BucketContentsBody, BucketSummary, BucketsReply, ContentsReply, CredentialsBody, ErrorReply,
    ObjectRecord, PreviewBody, PreviewDocument, VerifyReply,
};
use services_network::{BackendRoute, HttpReply, Transport, TransportError};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Bytes read from the head of an object for a preview
const HEAD_BYTES: usize = 100_000;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const STORAGE_CLASS: &str = "STANDARD";

#[derive(Debug)]
struct Account {
    secret: String,
    can_list_buckets: bool,
}

#[derive(Debug, Default)]
struct State {
    accounts: BTreeMap<String, Account>,
    buckets: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    faults: FaultInjector,
    requests: Vec<BackendRoute>,
}

/// Deterministic stand-in for the storage backend
///
/// Objects are kept in key order, as S3 lists them.
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    state: Mutex<State>,
}

impl SimulatedBackend {
    /// Creates a backend with no accounts and no buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account allowed to list buckets
    pub fn with_account(self, access_key_id: &str, secret_access_key: &str) -> Self {
        self.lock().accounts.insert(
            access_key_id.to_string(),
            Account {
                secret: secret_access_key.to_string(),
                can_list_buckets: true,
            },
        );
        self
    }

    /// Adds an account that may not enumerate buckets
    pub fn with_restricted_account(self, access_key_id: &str, secret_access_key: &str) -> Self {
        self.lock().accounts.insert(
            access_key_id.to_string(),
            Account {
                secret: secret_access_key.to_string(),
                can_list_buckets: false,
            },
        );
        self
    }

    /// Adds an empty bucket
    pub fn with_bucket(self, bucket: &str) -> Self {
        self.lock().buckets.entry(bucket.to_string()).or_default();
        self
    }

    /// Adds an object, creating its bucket if needed
    pub fn with_object(self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) -> Self {
        self.put_object(bucket, key, data);
        self
    }

    /// Installs a fault plan
    pub fn with_faults(self, plan: FaultPlan) -> Self {
        self.set_fault_plan(plan);
        self
    }

    /// Stores an object, replacing any previous one
    pub fn put_object(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) {
        self.lock()
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.into());
    }

    /// Replaces the fault plan
    pub fn set_fault_plan(&self, plan: FaultPlan) {
        self.lock().faults = FaultInjector::new(plan);
    }

    /// Requests received on `route`, including faulted ones
    pub fn request_count(&self, route: BackendRoute) -> usize {
        self.lock().requests.iter().filter(|r| **r == route).count()
    }

    /// Faults injected so far
    pub fn injected_faults(&self) -> usize {
        self.lock().faults.injected()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for SimulatedBackend {
    fn post(&self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError> {
        let route = url
            .rfind('/')
            .and_then(|index| BackendRoute::from_path(&url[index..]));
        let route = match route {
            Some(route) => route,
            None => return Ok(error_reply(404, "Not Found")),
        };

        let mut state = self.lock();
        state.requests.push(route);
        match state.faults.next_fault(route) {
            Some(FaultAction::Status(status)) => return Ok(error_reply(status, "Injected fault")),
            Some(FaultAction::Disconnect) => {
                return Err(TransportError::Connection("connection reset".to_string()))
            }
            Some(FaultAction::Timeout) => return Err(TransportError::Timeout),
            None => {}
        }

        Ok(match route {
            BackendRoute::VerifyCredentials => with_body(body, |b| state.verify(b)),
            BackendRoute::ListBuckets => with_body(body, |b| state.list_buckets(b)),
            BackendRoute::ListBucketContents => with_body(body, |b| state.list_contents(b)),
            BackendRoute::QuickPreview => with_body(body, |b| state.preview(b)),
        })
    }
}

type Handled = Result<HttpReply, (u16, String)>;

impl State {
    fn authenticate(&self, access_key_id: &str, secret: &str, status: u16) -> Result<&Account, (u16, String)> {
        match self.accounts.get(access_key_id) {
            Some(account) if account.secret == secret => Ok(account),
            _ => Err((status, "InvalidAccessKeyId".to_string())),
        }
    }

    fn bucket(&self, name: &str) -> Result<&BTreeMap<String, Vec<u8>>, (u16, String)> {
        self.buckets
            .get(name)
            .ok_or_else(|| (400, format!("NoSuchBucket: {name}")))
    }

    fn verify(&self, body: CredentialsBody) -> Handled {
        self.authenticate(&body.access_key_id, &body.secret_access_key, 401)
            .map_err(|_| (401, "Invalid credentials".to_string()))?;
        Ok(json_reply(&VerifyReply {
            message: "Credentials verified successfully".to_string(),
        }))
    }

    fn list_buckets(&self, body: CredentialsBody) -> Handled {
        let account = self.authenticate(&body.access_key_id, &body.secret_access_key, 400)?;
        if !account.can_list_buckets {
            return Err((400, "AccessDenied: ListBuckets".to_string()));
        }
        let buckets = self
            .buckets
            .iter()
            .map(|(name, objects)| {
                let bytes: u64 = objects.values().map(|data| data.len() as u64).sum();
                BucketSummary {
                    name: name.clone(),
                    size: bytes as f64 / BYTES_PER_GB,
                    files: objects.len() as u64,
                }
            })
            .collect();
        Ok(json_reply(&BucketsReply { buckets }))
    }

    fn list_contents(&self, body: BucketContentsBody) -> Handled {
        self.authenticate(&body.access_key_id, &body.secret_access_key, 400)?;
        let contents = self
            .bucket(&body.bucket_name)?
            .iter()
            .filter(|(key, _)| key.starts_with(&body.prefix))
            .map(|(key, data)| ObjectRecord {
                name: key.clone(),
                size: data.len() as u64,
                storage_type: Some(STORAGE_CLASS.to_string()),
            })
            .collect();
        Ok(json_reply(&ContentsReply { contents }))
    }

    fn preview(&self, body: PreviewBody) -> Handled {
        self.authenticate(&body.access_key_id, &body.secret_access_key, 400)?;
        let data = self
            .bucket(&body.bucket_name)?
            .get(&body.file_name)
            .ok_or_else(|| (400, format!("NoSuchKey: {}", body.file_name)))?;
        let head = &data[..data.len().min(HEAD_BYTES)];
        let detection = detect(head);
        Ok(json_reply(&PreviewDocument {
            file_name: body.file_name,
            file_type: detection.file_type,
            delimiter: detection.delimiter.map(String::from),
            preview_text: preview_text(head),
            total_bytes: data.len() as u64,
        }))
    }
}

fn with_body<B, F>(body: &[u8], handler: F) -> HttpReply
where
    B: DeserializeOwned,
    F: FnOnce(B) -> Handled,
{
    let parsed = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(err) => return error_reply(422, &err.to_string()),
    };
    handler(parsed).unwrap_or_else(|(status, detail)| error_reply(status, &detail))
}

fn json_reply<T: Serialize>(value: &T) -> HttpReply {
    match serde_json::to_vec(value) {
        Ok(body) => HttpReply::new(200, body),
        Err(err) => error_reply(500, &err.to_string()),
    }
}

fn error_reply(status: u16, detail: &str) -> HttpReply {
    let body = serde_json::to_vec(&ErrorReply {
        detail: detail.to_string(),
    })
    .unwrap_or_default();
    HttpReply::new(status, body)
}

//! # Bucket Select Service
//!
//! Picks the bucket the browser works in.
//!
//! ## Philosophy
//!
//! - **Enumeration is best effort**: If the key pair may not list buckets the
//!   selector degrades to a typed bucket name instead of failing
//! - **Typed beats chosen**: Choosing from the list fills the text value too,
//!   and confirm takes whatever the text value holds
//! - **Explicit states**: Loading, choices and manual entry are separate
//!   states, never flags inferred from an empty list
//!
//! ## Example
//!
//! ```ignore
//! let mut selector = BucketSelector::new(logger, notifier);
//! let request = selector.begin(&session);
//! let result = request.fetch(&client);
//! selector.complete(request.request_id, result);
//! selector.choose("reports")?;
//! let bucket = selector.confirm()?;
//! ```

use core_types::{BucketName, BucketNameError, RequestId};
use identity::{Credentials, Session};
use services_logger::{LogLevel, Logger};
use services_network::{BucketSource, BucketSummary, FetchError};
use services_notification::{ComponentScope, Notification, Notifier};
use thiserror::Error;

/// Bucket enumeration was refused or failed
///
/// Never fatal: the selector falls back to manual entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("List bucket permissions aren't enabled")]
pub struct PermissionError {
    /// What the backend said
    pub reason: String,
}

/// Errors from selector operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("No bucket chosen")]
    NothingChosen,

    #[error("Bucket {0:?} is not among the listed buckets")]
    UnknownBucket(String),

    #[error("Buckets are not listed")]
    NoChoices,

    #[error("Invalid bucket name: {0}")]
    InvalidName(#[from] BucketNameError),
}

/// Selector state
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorState {
    /// No enumeration requested yet
    Idle,
    /// Waiting for the bucket list
    Loading { request_id: RequestId },
    /// Buckets to choose from
    Choices(Vec<BucketSummary>),
    /// Enumeration unavailable; the bucket name is typed
    ManualEntry { reason: Option<PermissionError> },
}

/// A bucket enumeration the host must carry out
#[derive(Debug, Clone)]
pub struct BucketListRequest {
    pub request_id: RequestId,
    pub credentials: Credentials,
}

impl BucketListRequest {
    /// Runs the request against a bucket source
    pub fn fetch<S: BucketSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Vec<BucketSummary>, FetchError> {
        source.list_buckets(&self.credentials)
    }
}

/// Dropdown label for a bucket
///
/// # Example
///
/// ```
/// use services_bucket_select::bucket_label;
/// use services_network::BucketSummary;
///
/// let summary = BucketSummary { name: "logs".to_string(), size: 1.5, files: 3 };
/// assert_eq!(bucket_label(&summary), "logs (1.50 GB, 3 files)");
/// ```
pub fn bucket_label(summary: &BucketSummary) -> String {
    format!(
        "{} ({:.2} GB, {} files)",
        summary.name, summary.size, summary.files
    )
}

/// Bucket selection state machine
#[derive(Debug)]
pub struct BucketSelector {
    state: SelectorState,
    selected: Option<String>,
    typed: String,
    confirmed: Option<BucketName>,
    expanded: bool,
    logger: Logger,
    notifier: Notifier,
}

impl BucketSelector {
    /// Creates an expanded selector with nothing loaded
    pub fn new(logger: Logger, notifier: Notifier) -> Self {
        Self {
            state: SelectorState::Idle,
            selected: None,
            typed: String::new(),
            confirmed: None,
            expanded: true,
            logger: logger.for_component("bucket_select"),
            notifier,
        }
    }

    /// Current state
    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    /// Starts bucket enumeration for a verified session
    pub fn begin(&mut self, session: &Session) -> BucketListRequest {
        self.notifier.dismiss_scope(ComponentScope::BucketSelect);
        let request_id = RequestId::new();
        self.logger.log(
            self.logger
                .entry(LogLevel::Debug, "listing buckets")
                .with_source(request_id)
                .with_field("session", session.id()),
        );
        self.state = SelectorState::Loading { request_id };
        BucketListRequest {
            request_id,
            credentials: session.credentials().clone(),
        }
    }

    /// Applies the enumeration result
    ///
    /// Results for anything but the pending request are ignored. Any failure
    /// switches to manual entry.
    pub fn complete(
        &mut self,
        request_id: RequestId,
        result: Result<Vec<BucketSummary>, FetchError>,
    ) -> &SelectorState {
        match self.state {
            SelectorState::Loading { request_id: pending } if pending == request_id => {}
            _ => {
                self.logger.log(
                    self.logger
                        .entry(LogLevel::Debug, "ignoring stale bucket list")
                        .with_source(request_id),
                );
                return &self.state;
            }
        }

        match result {
            Ok(buckets) => {
                self.logger.log(
                    self.logger
                        .entry(LogLevel::Info, "buckets listed")
                        .with_source(request_id)
                        .with_field("count", buckets.len()),
                );
                self.state = SelectorState::Choices(buckets);
            }
            Err(err) => {
                let permission = PermissionError {
                    reason: err.to_string(),
                };
                self.logger.log(
                    self.logger
                        .entry(LogLevel::Warn, "bucket listing unavailable")
                        .with_source(request_id)
                        .with_field("error", &err),
                );
                self.notifier.notify(Notification::warning(
                    ComponentScope::BucketSelect,
                    permission.to_string(),
                ));
                self.state = SelectorState::ManualEntry {
                    reason: Some(permission),
                };
            }
        }
        &self.state
    }

    /// Switches to typing a bucket name without enumerating
    pub fn enter_manually(&mut self) {
        self.state = SelectorState::ManualEntry { reason: None };
    }

    /// Listed buckets, empty unless showing choices
    pub fn buckets(&self) -> &[BucketSummary] {
        match &self.state {
            SelectorState::Choices(buckets) => buckets,
            _ => &[],
        }
    }

    /// Dropdown labels in listing order
    pub fn labels(&self) -> Vec<String> {
        self.buckets().iter().map(bucket_label).collect()
    }

    /// Chooses a listed bucket; fills the text value as well
    pub fn choose(&mut self, name: &str) -> Result<(), SelectError> {
        if !matches!(self.state, SelectorState::Choices(_)) {
            return Err(SelectError::NoChoices);
        }
        if !self.buckets().iter().any(|bucket| bucket.name == name) {
            return Err(SelectError::UnknownBucket(name.to_string()));
        }
        self.selected = Some(name.to_string());
        self.typed = name.to_string();
        Ok(())
    }

    /// Replaces the text value
    pub fn type_name(&mut self, text: impl Into<String>) {
        self.typed = text.into();
    }

    /// Chosen bucket name, if any
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Current text value
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Confirms the typed name, or the chosen one when nothing is typed
    ///
    /// Collapses the panel on success.
    pub fn confirm(&mut self) -> Result<BucketName, SelectError> {
        let candidate = if !self.typed.trim().is_empty() {
            self.typed.as_str()
        } else {
            self.selected.as_deref().ok_or(SelectError::NothingChosen)?
        };
        let bucket = BucketName::new(candidate)?;

        self.logger.log(
            self.logger
                .entry(LogLevel::Info, "bucket confirmed")
                .with_field("bucket", &bucket),
        );
        self.confirmed = Some(bucket.clone());
        self.expanded = false;
        Ok(bucket)
    }

    /// Confirmed bucket, if any
    pub fn confirmed(&self) -> Option<&BucketName> {
        self.confirmed.as_ref()
    }

    /// Reopens the panel to pick another bucket
    pub fn expand(&mut self) {
        self.expanded = true;
    }

    /// Whether the panel is open
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

//! Path navigation
//!
//! The navigator owns the browsed path and the listing shown for it. Actions
//! compute their target from the committed path and return a
//! [`ListingRequest`]; the path changes only when that request's listing
//! arrives. A bucket switch is pending the same way: the bucket and the reset
//! to the root commit together with the first listing of the new bucket.

use crate::{BrowserError, CompletionOutcome};
use core_types::{BucketName, RequestId};
use identity::Session;
use object_view::{build_listing, Listing, ObjectEntry, VirtualPath};
use services_logger::{LogLevel, Logger};
use services_network::{FetchError, ListingSource};
use services_notification::{ComponentScope, Notification, Notifier};
use services_settings::{defaults, BrowserSettings};
use std::collections::HashSet;

/// Tags a listing request with what it was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    /// Issue order; only the highest is current
    pub generation: u64,
    pub request_id: RequestId,
    pub bucket: BucketName,
    pub path: VirtualPath,
}

/// A listing the host must fetch
#[derive(Debug, Clone)]
pub struct ListingRequest {
    pub ticket: RequestTicket,
    pub session: Session,
}

impl ListingRequest {
    /// Key prefix to ask the backend for
    pub fn prefix(&self) -> &str {
        self.ticket.path.key_prefix()
    }

    /// Runs the request against a listing source
    pub fn fetch<S: ListingSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<Vec<ObjectEntry>, FetchError> {
        source.list_objects(&self.session, &self.ticket.bucket, self.prefix())
    }
}

/// What the listing region shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    /// No bucket selected yet
    Idle,
    /// Waiting for the listing of `target`
    Loading { target: VirtualPath },
    /// Listing of the current path
    Loaded(Listing),
    /// Latest request failed; the current path is unchanged
    Failed(BrowserError),
}

/// Drives which prefix is listed next
#[derive(Debug)]
pub struct Navigator {
    session: Session,
    bucket: Option<BucketName>,
    current_path: VirtualPath,
    state: NavigationState,
    generation: u64,
    latest: Option<RequestTicket>,
    dedupe_keys: bool,
    size_precision: usize,
    logger: Logger,
    notifier: Notifier,
}

impl Navigator {
    /// Creates a navigator for a verified session
    pub fn new(session: Session, logger: Logger, notifier: Notifier) -> Self {
        Self {
            session,
            bucket: None,
            current_path: VirtualPath::root(),
            state: NavigationState::Idle,
            generation: 0,
            latest: None,
            dedupe_keys: true,
            size_precision: defaults::DISPLAY_SIZE_PRECISION,
            logger: logger.for_component("browser"),
            notifier,
        }
    }

    /// Applies a settings snapshot
    pub fn with_settings(mut self, settings: &BrowserSettings) -> Self {
        self.dedupe_keys = settings.dedupe_keys;
        self.size_precision = settings.size_precision;
        self
    }

    /// Session listings are fetched with
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Decimal places used for rendered sizes
    pub fn size_precision(&self) -> usize {
        self.size_precision
    }

    /// Bucket of the committed listing
    pub fn bucket(&self) -> Option<&BucketName> {
        self.bucket.as_ref()
    }

    /// Committed path
    pub fn current_path(&self) -> &VirtualPath {
        &self.current_path
    }

    /// Region state
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Listing of the current path, when loaded
    pub fn listing(&self) -> Option<&Listing> {
        match &self.state {
            NavigationState::Loaded(listing) => Some(listing),
            _ => None,
        }
    }

    /// Returns true while a request is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self.state, NavigationState::Loading { .. })
    }

    /// Ticket of the newest request issued
    pub fn latest_ticket(&self) -> Option<&RequestTicket> {
        self.latest.as_ref()
    }

    /// Bucket the region is showing or about to show
    fn shown_bucket(&self) -> Option<&BucketName> {
        match (&self.state, &self.latest) {
            (NavigationState::Loading { .. }, Some(ticket)) => Some(&ticket.bucket),
            _ => self.bucket.as_ref(),
        }
    }

    /// Switches to `bucket` and lists its root
    ///
    /// Selecting the bucket that is loaded or loading issues nothing. After a
    /// failure any selection issues, so a failed switch can be repeated.
    pub fn select_bucket(&mut self, bucket: BucketName) -> Option<ListingRequest> {
        let failed = matches!(self.state, NavigationState::Failed(_));
        if !failed && self.shown_bucket() == Some(&bucket) {
            return None;
        }
        self.logger.log(
            self.logger
                .entry(LogLevel::Info, "bucket selected")
                .with_field("bucket", &bucket),
        );
        Some(self.issue(bucket, VirtualPath::root()))
    }

    /// Lists the child folder `name` of the current path
    pub fn enter_folder(&mut self, name: &str) -> Result<ListingRequest, BrowserError> {
        let bucket = self.bucket.clone().ok_or(BrowserError::NoBucket)?;
        let target = self.current_path.join(name)?;
        Ok(self.issue(bucket, target))
    }

    /// Lists the parent of the current path; nothing at the root
    pub fn go_up(&mut self) -> Option<ListingRequest> {
        let bucket = self.bucket.clone()?;
        let target = self.current_path.parent()?;
        Some(self.issue(bucket, target))
    }

    /// Lists the committed path again; nothing before a bucket has loaded
    pub fn refresh(&mut self) -> Option<ListingRequest> {
        let bucket = self.bucket.clone()?;
        Some(self.issue(bucket, self.current_path.clone()))
    }

    /// Re-issues the newest request's bucket and target
    pub fn retry(&mut self) -> Option<ListingRequest> {
        let latest = self.latest.as_ref()?;
        let (bucket, target) = (latest.bucket.clone(), latest.path.clone());
        Some(self.issue(bucket, target))
    }

    fn issue(&mut self, bucket: BucketName, target: VirtualPath) -> ListingRequest {
        self.generation += 1;
        let ticket = RequestTicket {
            generation: self.generation,
            request_id: RequestId::new(),
            bucket,
            path: target.clone(),
        };

        self.notifier.dismiss_scope(ComponentScope::Browser);
        self.logger.log(
            self.logger
                .entry(LogLevel::Debug, "listing requested")
                .with_source(ticket.request_id)
                .with_field("bucket", &ticket.bucket)
                .with_field("path", &ticket.path),
        );

        self.latest = Some(ticket.clone());
        self.state = NavigationState::Loading { target };
        ListingRequest {
            ticket,
            session: self.session.clone(),
        }
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.is_loading() && self.latest.as_ref() == Some(ticket)
    }

    /// Applies a listing result
    pub fn complete_listing(
        &mut self,
        ticket: &RequestTicket,
        result: Result<Vec<ObjectEntry>, FetchError>,
    ) -> CompletionOutcome {
        if !self.is_current(ticket) {
            self.logger.log(
                self.logger
                    .entry(LogLevel::Debug, "discarding stale listing")
                    .with_source(ticket.request_id)
                    .with_field("path", &ticket.path),
            );
            return CompletionOutcome::Stale;
        }

        match result {
            Ok(entries) => {
                let entries = if self.dedupe_keys {
                    self.dedupe(entries)
                } else {
                    entries
                };
                let listing = build_listing(&entries, &ticket.path);
                self.logger.log(
                    self.logger
                        .entry(LogLevel::Info, "listing loaded")
                        .with_source(ticket.request_id)
                        .with_field("path", &ticket.path)
                        .with_field("nodes", listing.len()),
                );
                if self.bucket.as_ref() != Some(&ticket.bucket) {
                    self.logger.log(
                        self.logger
                            .entry(LogLevel::Info, "bucket changed")
                            .with_field("bucket", &ticket.bucket),
                    );
                    self.bucket = Some(ticket.bucket.clone());
                }
                self.current_path = ticket.path.clone();
                self.state = NavigationState::Loaded(listing);
                CompletionOutcome::Applied
            }
            Err(err) => {
                self.logger.log(
                    self.logger
                        .entry(LogLevel::Warn, "listing failed")
                        .with_source(ticket.request_id)
                        .with_field("path", &ticket.path)
                        .with_field("error", &err),
                );
                self.notifier.notify(Notification::error(
                    ComponentScope::Browser,
                    "Failed to fetch bucket contents",
                ));
                self.state = NavigationState::Failed(BrowserError::ListingFailed(err));
                CompletionOutcome::Failed
            }
        }
    }

    fn dedupe(&self, entries: Vec<ObjectEntry>) -> Vec<ObjectEntry> {
        let total = entries.len();
        let mut seen = HashSet::with_capacity(total);
        let unique: Vec<ObjectEntry> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.key.clone()))
            .collect();
        if unique.len() < total {
            self.logger.log(
                self.logger
                    .entry(LogLevel::Warn, "dropped duplicate keys")
                    .with_field("dropped", total - unique.len()),
            );
        }
        unique
    }
}

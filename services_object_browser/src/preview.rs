//! File preview pane
//!
//! Preview fetches carry their own tickets and state. Nothing here reads or
//! writes navigation state.

use crate::{BrowserError, CompletionOutcome};
use core_types::{BucketName, RequestId};
use identity::Session;
use object_view::{FileNode, PreviewTable};
use services_logger::{LogLevel, Logger};
use services_network::{FetchError, PreviewDocument, PreviewSource};
use services_notification::{ComponentScope, Notification, Notifier};
use services_settings::{defaults, BrowserSettings};

/// Tags a preview request with the object it was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTicket {
    pub generation: u64,
    pub request_id: RequestId,
    pub bucket: BucketName,
    pub key: String,
}

/// A preview the host must fetch
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub ticket: PreviewTicket,
    pub session: Session,
}

impl PreviewRequest {
    /// Runs the request against a preview source
    pub fn fetch<S: PreviewSource + ?Sized>(&self, source: &S) -> Result<PreviewDocument, FetchError> {
        source.preview(&self.session, &self.ticket.bucket, &self.ticket.key)
    }
}

/// A loaded preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Object key
    pub key: String,
    pub file_type: String,
    pub delimiter: Option<String>,
    /// Preview text, capped at the configured byte limit
    pub text: String,
    /// Whether `text` was cut short locally
    pub truncated: bool,
    /// Full object size
    pub total_bytes: u64,
    /// Parsed header and rows, if there is text
    pub table: Option<PreviewTable>,
}

/// What the preview pane shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    /// Closed
    Idle,
    /// Waiting for `key`
    Loading { key: String },
    Ready(Preview),
    /// Request failed for `key`
    Failed { key: String, error: BrowserError },
}

/// Preview pane
#[derive(Debug)]
pub struct PreviewPane {
    session: Session,
    state: PreviewState,
    generation: u64,
    latest: Option<PreviewTicket>,
    max_bytes: usize,
    max_rows: usize,
    logger: Logger,
    notifier: Notifier,
}

impl PreviewPane {
    /// Creates a closed pane
    pub fn new(session: Session, logger: Logger, notifier: Notifier) -> Self {
        Self {
            session,
            state: PreviewState::Idle,
            generation: 0,
            latest: None,
            max_bytes: defaults::PREVIEW_MAX_BYTES,
            max_rows: defaults::PREVIEW_MAX_ROWS,
            logger: logger.for_component("preview"),
            notifier,
        }
    }

    /// Applies a settings snapshot
    pub fn with_settings(mut self, settings: &BrowserSettings) -> Self {
        self.max_bytes = settings.preview_max_bytes;
        self.max_rows = settings.preview_max_rows;
        self
    }

    /// Pane state
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// Loaded preview, if any
    pub fn preview(&self) -> Option<&Preview> {
        match &self.state {
            PreviewState::Ready(preview) => Some(preview),
            _ => None,
        }
    }

    /// Returns true unless closed
    pub fn is_open(&self) -> bool {
        self.state != PreviewState::Idle
    }

    /// Byte limit applied to preview text
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Opens the preview for a file in a listing
    pub fn open(&mut self, bucket: &BucketName, file: &FileNode) -> PreviewRequest {
        self.open_key(bucket, &file.full_path)
    }

    /// Opens the preview for an object key
    pub fn open_key(&mut self, bucket: &BucketName, key: &str) -> PreviewRequest {
        self.generation += 1;
        let ticket = PreviewTicket {
            generation: self.generation,
            request_id: RequestId::new(),
            bucket: bucket.clone(),
            key: key.to_string(),
        };

        self.notifier.dismiss_scope(ComponentScope::Preview);
        self.logger.log(
            self.logger
                .entry(LogLevel::Debug, "preview requested")
                .with_source(ticket.request_id)
                .with_field("bucket", bucket)
                .with_field("key", key),
        );

        self.latest = Some(ticket.clone());
        self.state = PreviewState::Loading {
            key: key.to_string(),
        };
        PreviewRequest {
            ticket,
            session: self.session.clone(),
        }
    }

    /// Closes the pane; an outstanding preview becomes stale
    pub fn close(&mut self) {
        self.latest = None;
        self.state = PreviewState::Idle;
    }

    /// Applies a preview result
    pub fn complete_preview(
        &mut self,
        ticket: &PreviewTicket,
        result: Result<PreviewDocument, FetchError>,
    ) -> CompletionOutcome {
        let pending = matches!(self.state, PreviewState::Loading { .. });
        if !pending || self.latest.as_ref() != Some(ticket) {
            self.logger.log(
                self.logger
                    .entry(LogLevel::Debug, "discarding stale preview")
                    .with_source(ticket.request_id)
                    .with_field("key", &ticket.key),
            );
            return CompletionOutcome::Stale;
        }

        match result {
            Ok(document) => {
                let (text, truncated) = cap_text(&document.preview_text, self.max_bytes);
                let table = PreviewTable::parse(text, self.max_rows);
                self.logger.log(
                    self.logger
                        .entry(LogLevel::Info, "preview loaded")
                        .with_source(ticket.request_id)
                        .with_field("key", &ticket.key)
                        .with_field("type", &document.file_type),
                );
                self.state = PreviewState::Ready(Preview {
                    key: ticket.key.clone(),
                    file_type: document.file_type,
                    delimiter: document.delimiter,
                    text: text.to_string(),
                    truncated,
                    total_bytes: document.total_bytes,
                    table,
                });
                CompletionOutcome::Applied
            }
            Err(err) => {
                self.logger.log(
                    self.logger
                        .entry(LogLevel::Warn, "preview failed")
                        .with_source(ticket.request_id)
                        .with_field("key", &ticket.key)
                        .with_field("error", &err),
                );
                self.notifier.notify(Notification::error(
                    ComponentScope::Preview,
                    "Failed to fetch file preview",
                ));
                self.state = PreviewState::Failed {
                    key: ticket.key.clone(),
                    error: BrowserError::PreviewFailed(err),
                };
                CompletionOutcome::Failed
            }
        }
    }
}

/// Cuts `text` to at most `max_bytes` without splitting a character
fn cap_text(text: &str, max_bytes: usize) -> (&str, bool) {
    if text.len() <= max_bytes {
        return (text, false);
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], true)
}

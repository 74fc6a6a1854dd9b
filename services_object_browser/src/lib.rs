//! # Object Browser Service
//!
//! Folder-style browsing of one bucket, plus a preview pane for files.
//!
//! ## Philosophy
//!
//! - **Requests are values**: Every fetch is handed to the host as a request
//!   carrying a ticket; the host performs it however it likes and feeds the
//!   result back
//! - **Last request wins**: Only the newest ticket can change state; anything
//!   older is discarded as stale
//! - **No partial navigation**: The current path moves only when a listing for
//!   it has arrived
//! - **Independent regions**: Preview fetches never touch navigation state
//!
//! ## Example
//!
//! ```ignore
//! use services_object_browser::{Navigator, run_listing};
//!
//! let mut navigator = Navigator::new(session, logger, notifier);
//! if let Some(request) = navigator.select_bucket(bucket) {
//!     run_listing(&mut navigator, &client, request);
//! }
//! let request = navigator.enter_folder("reports")?;
//! run_listing(&mut navigator, &client, request);
//! ```

pub mod navigator;
pub mod operations;
pub mod preview;
pub mod render;

pub use navigator::{ListingRequest, NavigationState, Navigator, RequestTicket};
pub use operations::{run_listing, run_preview};
pub use preview::{Preview, PreviewPane, PreviewRequest, PreviewState, PreviewTicket};

use object_view::PathError;
use services_network::FetchError;
use thiserror::Error;

/// Errors surfaced by the browser and preview regions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrowserError {
    /// Navigation needs a bucket first
    #[error("No bucket selected")]
    NoBucket,

    /// Folder name cannot be appended to the path
    #[error("Cannot enter folder: {0}")]
    InvalidFolder(#[from] PathError),

    /// Listing request failed
    #[error("Failed to fetch bucket contents: {0}")]
    ListingFailed(FetchError),

    /// Preview request failed
    #[error("Failed to fetch file preview: {0}")]
    PreviewFailed(FetchError),
}

/// What happened to a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Result applied to state
    Applied,
    /// Failure recorded; prior committed state kept
    Failed,
    /// Ticket was superseded; result dropped
    Stale,
}

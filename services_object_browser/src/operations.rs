//! Synchronous request drivers
//!
//! Hosts without their own scheduling can fetch and complete a request in
//! one call. Deferred or reordered delivery goes through `complete_*`
//! directly.

use crate::navigator::{ListingRequest, Navigator};
use crate::preview::{PreviewPane, PreviewRequest};
use crate::CompletionOutcome;
use services_network::{ListingSource, PreviewSource};

/// Fetches a listing and hands the result to the navigator
pub fn run_listing<S: ListingSource + ?Sized>(
    navigator: &mut Navigator,
    source: &S,
    request: ListingRequest,
) -> CompletionOutcome {
    let result = request.fetch(source);
    navigator.complete_listing(&request.ticket, result)
}

/// Fetches a preview and hands the result to the pane
pub fn run_preview<S: PreviewSource + ?Sized>(
    pane: &mut PreviewPane,
    source: &S,
    request: PreviewRequest,
) -> CompletionOutcome {
    let result = request.fetch(source);
    pane.complete_preview(&request.ticket, result)
}

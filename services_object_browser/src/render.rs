//! Rendering logic for the browser regions
//!
//! Turns navigator and preview state into plain text lines.

use crate::navigator::{NavigationState, Navigator};
use crate::preview::{Preview, PreviewPane, PreviewState};
use object_view::{format_size, ListingNode};

pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No contents found in this location.";
pub const NO_BUCKET_TEXT: &str = "No bucket selected";
pub const NO_PREVIEW_TEXT: &str = "No preview available";
/// Shown above the listing whenever `go_up` would do something
pub const BACK_MARKER: &str = "../";

impl Navigator {
    /// Renders the listing region
    ///
    /// While loading, the header names the requested bucket and path.
    pub fn render_lines(&self) -> Vec<String> {
        let (bucket, path) = match (self.state(), self.latest_ticket()) {
            (NavigationState::Loading { target }, Some(ticket)) => (Some(&ticket.bucket), target),
            _ => (self.bucket(), self.current_path()),
        };

        let mut lines = match bucket {
            Some(bucket) => vec![format!("{}  Current Path: {}", bucket, path)],
            None => vec![NO_BUCKET_TEXT.to_string()],
        };
        if bucket.is_some() && !path.is_root() {
            lines.push(BACK_MARKER.to_string());
        }
        let precision = self.size_precision();

        match self.state() {
            NavigationState::Idle => {}
            NavigationState::Loading { .. } => lines.push(LOADING_TEXT.to_string()),
            NavigationState::Failed(error) => lines.push(error.to_string()),
            NavigationState::Loaded(listing) if listing.is_empty() => {
                lines.push(EMPTY_TEXT.to_string())
            }
            NavigationState::Loaded(listing) => {
                lines.extend(listing.nodes().iter().map(|node| format_node(node, precision)))
            }
        }
        lines
    }
}

impl PreviewPane {
    /// Renders the preview region; nothing when closed
    pub fn render_lines(&self) -> Vec<String> {
        match self.state() {
            PreviewState::Idle => Vec::new(),
            PreviewState::Loading { key } => vec![key.clone(), LOADING_TEXT.to_string()],
            PreviewState::Failed { key, error } => vec![key.clone(), error.to_string()],
            PreviewState::Ready(preview) => render_preview(preview, self.max_bytes()),
        }
    }
}

/// Formats a single listing node
fn format_node(node: &ListingNode, precision: usize) -> String {
    match node {
        ListingNode::Folder(folder) => format!(
            "{}/  {} items, {}",
            folder.name,
            folder.count,
            format_size(folder.size, precision)
        ),
        ListingNode::File(file) => format!("{}  {}", file.name, format_size(file.size, precision)),
    }
}

/// Lines for a loaded preview
///
/// Without a table, "No preview available" takes the table's place; the file
/// type and the byte-limit note follow it in every case, even when the
/// backend returned no text at all.
fn render_preview(preview: &Preview, max_bytes: usize) -> Vec<String> {
    let mut lines = vec![preview.key.clone()];
    match &preview.table {
        Some(table) => {
            lines.push(table.headers.join(" | "));
            lines.extend(table.rows.iter().map(|row| row.join(" | ")));
        }
        None => lines.push(NO_PREVIEW_TEXT.to_string()),
    }
    lines.push(format!("File Type: {}", preview.file_type));
    lines.push(format!(
        "This is a preview of the first {} bytes of the file.",
        group_thousands(max_bytes)
    ));
    lines
}

/// `10000` as `"10,000"`
fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

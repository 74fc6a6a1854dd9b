//! # Object View
//!
//! This crate provides a folder-like view over flat object storage listings.
//!
//! ## Philosophy
//!
//! - **Folders are inferred, not stored**: A folder exists only because some
//!   key continues past it
//! - **One level at a time**: A listing shows the immediate children of one
//!   prefix and nothing deeper
//! - **Pure transforms**: Building a listing has no hidden state; the same
//!   entries and path always give the same listing
//!
//! ## Design
//!
//! - An [`ObjectEntry`] is a key and a size, exactly as the backend reports it
//! - A [`VirtualPath`] is the browsed prefix, always `/`-delimited on both ends
//! - [`build_listing`] groups entries into folders (first-seen order) followed
//!   by files (scan order)

pub mod entry;
pub mod format;
pub mod listing;
pub mod path;
pub mod table;

pub use entry::ObjectEntry;
pub use format::format_size;
pub use listing::{build_listing, FileNode, FolderNode, Listing, ListingBuilder, ListingNode};
pub use path::{PathError, VirtualPath};
pub use table::PreviewTable;

//! One-level listings built from flat object entries
//!
//! This module defines how a prefix of a bucket is presented as folders and
//! files.

use crate::entry::ObjectEntry;
use crate::path::VirtualPath;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An inferred folder
///
/// `size` and `count` cover every entry whose relative path starts with this
/// folder, at any depth below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Single path segment
    pub name: String,
    /// Sum of the sizes of contributing entries
    pub size: u64,
    /// Number of contributing entries
    pub count: usize,
}

/// A file directly under the listed prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Single path segment
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Full object key
    pub full_path: String,
}

/// A single entry in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingNode {
    Folder(FolderNode),
    File(FileNode),
}

impl ListingNode {
    /// Name of this node
    pub fn name(&self) -> &str {
        match self {
            ListingNode::Folder(folder) => &folder.name,
            ListingNode::File(file) => &file.name,
        }
    }

    /// Size in bytes (aggregated for folders)
    pub fn size(&self) -> u64 {
        match self {
            ListingNode::Folder(folder) => folder.size,
            ListingNode::File(file) => file.size,
        }
    }

    /// Whether this node is a folder
    pub fn is_folder(&self) -> bool {
        matches!(self, ListingNode::Folder(_))
    }
}

/// One level of the virtual hierarchy
///
/// All folders come first, in the order they were first seen, followed by all
/// files in scan order. Consumers may rely on this ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    nodes: Vec<ListingNode>,
}

impl Listing {
    /// Creates an empty listing
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    /// All nodes, folders first
    pub fn nodes(&self) -> &[ListingNode] {
        &self.nodes
    }

    /// Iterates over the folder nodes
    pub fn folders(&self) -> impl Iterator<Item = &FolderNode> {
        self.nodes.iter().filter_map(|node| match node {
            ListingNode::Folder(folder) => Some(folder),
            ListingNode::File(_) => None,
        })
    }

    /// Iterates over the file nodes
    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.nodes.iter().filter_map(|node| match node {
            ListingNode::File(file) => Some(file),
            ListingNode::Folder(_) => None,
        })
    }

    /// Finds a node by name
    pub fn get(&self, name: &str) -> Option<&ListingNode> {
        self.nodes.iter().find(|node| node.name() == name)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there is nothing at this level
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Incrementally groups entries under one prefix
#[derive(Debug, Clone)]
pub struct ListingBuilder {
    path: VirtualPath,
    folders: Vec<FolderNode>,
    folder_index: HashMap<String, usize>,
    files: Vec<FileNode>,
}

impl ListingBuilder {
    /// Creates a builder for the given prefix
    pub fn new(path: VirtualPath) -> Self {
        Self {
            path,
            folders: Vec::new(),
            folder_index: HashMap::new(),
            files: Vec::new(),
        }
    }

    /// Classifies one entry
    ///
    /// Entries outside the prefix and the directory marker equal to the
    /// prefix itself are ignored. Returns true if the entry contributed.
    pub fn push(&mut self, entry: &ObjectEntry) -> bool {
        let relative = match entry.key.strip_prefix(self.path.key_prefix()) {
            Some(relative) => relative,
            None => return false,
        };

        let mut parts = relative.split('/');
        let first = parts.next().unwrap_or_default();
        if first.is_empty() {
            return false;
        }

        if parts.next().is_some() {
            let index = match self.folder_index.get(first) {
                Some(&index) => index,
                None => {
                    self.folders.push(FolderNode {
                        name: first.to_string(),
                        size: 0,
                        count: 0,
                    });
                    self.folder_index
                        .insert(first.to_string(), self.folders.len() - 1);
                    self.folders.len() - 1
                }
            };
            let folder = &mut self.folders[index];
            folder.size = folder.size.saturating_add(entry.size);
            folder.count += 1;
        } else {
            self.files.push(FileNode {
                name: first.to_string(),
                size: entry.size,
                full_path: entry.key.clone(),
            });
        }
        true
    }

    /// Produces the listing, folders first
    pub fn finish(self) -> Listing {
        let nodes = self
            .folders
            .into_iter()
            .map(ListingNode::Folder)
            .chain(self.files.into_iter().map(ListingNode::File))
            .collect();
        Listing { nodes }
    }
}

/// Builds one level of the virtual hierarchy for `current_path`
///
/// Duplicate keys are not collapsed here; each occurrence counts.
///
/// # Examples
///
/// ```
/// use object_view::{build_listing, ObjectEntry, VirtualPath};
///
/// let entries = vec![
///     ObjectEntry::new("a/b.txt", 100),
///     ObjectEntry::new("a/c/d.txt", 50),
///     ObjectEntry::new("e.txt", 10),
/// ];
/// let listing = build_listing(&entries, &VirtualPath::root());
/// let names: Vec<_> = listing.nodes().iter().map(|n| n.name()).collect();
/// assert_eq!(names, vec!["a", "e.txt"]);
/// ```
pub fn build_listing(entries: &[ObjectEntry], current_path: &VirtualPath) -> Listing {
    let mut builder = ListingBuilder::new(current_path.clone());
    for entry in entries {
        builder.push(entry);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<ObjectEntry> {
        vec![
            ObjectEntry::new("a/b.txt", 100),
            ObjectEntry::new("a/c/d.txt", 50),
            ObjectEntry::new("e.txt", 10),
        ]
    }

    fn folder(name: &str, size: u64, count: usize) -> ListingNode {
        ListingNode::Folder(FolderNode {
            name: name.to_string(),
            size,
            count,
        })
    }

    fn file(name: &str, size: u64, full_path: &str) -> ListingNode {
        ListingNode::File(FileNode {
            name: name.to_string(),
            size,
            full_path: full_path.to_string(),
        })
    }

    #[test]
    fn test_listing_at_root() {
        let listing = build_listing(&sample_entries(), &VirtualPath::root());
        assert_eq!(
            listing.nodes(),
            &[folder("a", 150, 2), file("e.txt", 10, "e.txt")]
        );
    }

    #[test]
    fn test_listing_in_folder() {
        let path = VirtualPath::parse("/a/").unwrap();
        let listing = build_listing(&sample_entries(), &path);
        assert_eq!(
            listing.nodes(),
            &[folder("c", 50, 1), file("b.txt", 100, "a/b.txt")]
        );
    }

    #[test]
    fn test_empty_entries() {
        let listing = build_listing(&[], &VirtualPath::root());
        assert!(listing.is_empty());
        assert_eq!(listing, Listing::empty());
    }

    #[test]
    fn test_directory_marker_is_skipped() {
        let entries = vec![
            ObjectEntry::new("a/", 0),
            ObjectEntry::new("a/b.txt", 5),
        ];
        let path = VirtualPath::parse("/a/").unwrap();
        let listing = build_listing(&entries, &path);
        assert_eq!(listing.nodes(), &[file("b.txt", 5, "a/b.txt")]);
    }

    #[test]
    fn test_marker_object_counts_toward_folder_at_parent() {
        // "a/" seen from the root has relative parts ["a", ""]
        let entries = vec![ObjectEntry::new("a/", 0)];
        let listing = build_listing(&entries, &VirtualPath::root());
        assert_eq!(listing.nodes(), &[folder("a", 0, 1)]);
    }

    #[test]
    fn test_entries_outside_prefix_are_skipped() {
        let entries = vec![
            ObjectEntry::new("b/x.txt", 1),
            ObjectEntry::new("ab.txt", 2),
            ObjectEntry::new("a/y.txt", 3),
        ];
        let path = VirtualPath::parse("/a/").unwrap();
        let listing = build_listing(&entries, &path);
        assert_eq!(listing.nodes(), &[file("y.txt", 3, "a/y.txt")]);
    }

    #[test]
    fn test_leading_empty_segment_is_skipped() {
        let entries = vec![ObjectEntry::new("a//z.txt", 7)];
        let path = VirtualPath::parse("/a/").unwrap();
        assert!(build_listing(&entries, &path).is_empty());
    }

    #[test]
    fn test_folders_precede_files_in_first_seen_order() {
        let entries = vec![
            ObjectEntry::new("z.txt", 1),
            ObjectEntry::new("m/1", 1),
            ObjectEntry::new("b.txt", 1),
            ObjectEntry::new("c/1", 1),
            ObjectEntry::new("m/2", 1),
        ];
        let listing = build_listing(&entries, &VirtualPath::root());
        let names: Vec<_> = listing.nodes().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["m", "c", "z.txt", "b.txt"]);
        let first_file = listing.nodes().iter().position(|n| !n.is_folder()).unwrap();
        assert!(listing.nodes()[first_file..].iter().all(|n| !n.is_folder()));
    }

    #[test]
    fn test_deep_entries_aggregate_into_top_folder() {
        let entries = vec![
            ObjectEntry::new("logs/2024/01/a.log", 10),
            ObjectEntry::new("logs/2024/02/b.log", 20),
            ObjectEntry::new("logs/c.log", 30),
        ];
        let listing = build_listing(&entries, &VirtualPath::root());
        assert_eq!(listing.nodes(), &[folder("logs", 60, 3)]);
    }

    #[test]
    fn test_duplicate_keys_are_counted_twice() {
        let entries = vec![
            ObjectEntry::new("a/b.txt", 4),
            ObjectEntry::new("a/b.txt", 4),
            ObjectEntry::new("f.txt", 1),
            ObjectEntry::new("f.txt", 1),
        ];
        let listing = build_listing(&entries, &VirtualPath::root());
        assert_eq!(listing.folders().next().unwrap().count, 2);
        assert_eq!(listing.files().count(), 2);
    }

    #[test]
    fn test_build_is_idempotent() {
        let path = VirtualPath::parse("/a/").unwrap();
        let first = build_listing(&sample_entries(), &path);
        let second = build_listing(&sample_entries(), &path);
        assert_eq!(first, second);
    }

    #[test]
    fn test_each_name_has_one_kind() {
        let entries = vec![
            ObjectEntry::new("x/1", 1),
            ObjectEntry::new("y", 1),
            ObjectEntry::new("x/2/3", 1),
            ObjectEntry::new("z/", 1),
        ];
        let listing = build_listing(&entries, &VirtualPath::root());
        let mut names: Vec<_> = listing.nodes().iter().map(|n| n.name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_builder_reports_contribution() {
        let mut builder = ListingBuilder::new(VirtualPath::parse("/a/").unwrap());
        assert!(builder.push(&ObjectEntry::new("a/x", 1)));
        assert!(!builder.push(&ObjectEntry::new("a/", 0)));
        assert!(!builder.push(&ObjectEntry::new("q/x", 1)));
        assert_eq!(builder.finish().len(), 1);
    }

    #[test]
    fn test_lookup_helpers() {
        let listing = build_listing(&sample_entries(), &VirtualPath::root());
        assert!(listing.get("a").unwrap().is_folder());
        assert_eq!(listing.get("e.txt").unwrap().size(), 10);
        assert!(listing.get("missing").is_none());
        assert_eq!(listing.folders().count(), 1);
        assert_eq!(listing.files().count(), 1);
    }

    #[test]
    fn test_node_serialization_is_tagged() {
        let json = serde_json::to_value(folder("a", 1, 1)).unwrap();
        assert_eq!(json["kind"], "folder");
        assert_eq!(json["name"], "a");
    }
}

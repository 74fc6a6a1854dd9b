//! Virtual path handling
//!
//! This module handles parsing and stepping through browsed prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while building or stepping a virtual path
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path is not `/`-delimited on both ends or has an empty component
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Name cannot be used as a single path segment
    #[error("Invalid folder name: {0:?}")]
    InvalidName(String),
}

/// A browsed prefix such as `/` or `/reports/2024/`
///
/// Invariant: the inner string begins and ends with `/`, and the root is
/// exactly `/`. Object keys carry no leading slash, so comparisons against keys
/// go through [`VirtualPath::key_prefix`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VirtualPath(String);

impl VirtualPath {
    /// Returns the root path `/`
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Parses a path
    ///
    /// # Examples
    ///
    /// ```
    /// use object_view::VirtualPath;
    ///
    /// let path = VirtualPath::parse("/docs/notes/").unwrap();
    /// assert_eq!(path.key_prefix(), "docs/notes/");
    ///
    /// assert!(VirtualPath::parse("docs/notes").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path == "/" {
            return Ok(Self::root());
        }
        if !path.starts_with('/') || !path.ends_with('/') {
            return Err(PathError::InvalidPath(format!(
                "{path:?} must begin and end with '/'"
            )));
        }
        if path[1..path.len() - 1].split('/').any(str::is_empty) {
            return Err(PathError::InvalidPath(format!(
                "{path:?} contains an empty component"
            )));
        }
        Ok(Self(path.to_string()))
    }

    /// Builds a path from a key prefix such as `docs/notes/`
    ///
    /// The empty prefix maps to the root.
    pub fn from_key_prefix(prefix: &str) -> Result<Self, PathError> {
        Self::parse(&format!("/{prefix}"))
    }

    /// Returns true if this is the root path
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the prefix object keys under this path start with
    ///
    /// The root contributes nothing, so every key is under it.
    pub fn key_prefix(&self) -> &str {
        &self.0[1..]
    }

    /// Iterates over the folder names along this path
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Number of folders below the root
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Returns the innermost folder name, if any
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Returns the path of the child folder `name`
    pub fn join(&self, name: &str) -> Result<Self, PathError> {
        if !Self::is_valid_name(name) {
            return Err(PathError::InvalidName(name.to_string()));
        }
        Ok(Self(format!("{}{}/", self.0, name)))
    }

    /// Returns the path one level up, or None at the root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let trimmed = &self.0[..self.0.len() - 1];
        let cut = trimmed.rfind('/')?;
        Some(Self(self.0[..=cut].to_string()))
    }

    /// Returns true if `key` lies under this path
    pub fn contains_key(&self, key: &str) -> bool {
        key.starts_with(self.key_prefix())
    }

    /// Validates a single folder name
    ///
    /// Object keys are literal, so `.` and `..` are ordinary names here.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty() && !name.contains('/') && !name.contains('\0')
    }
}

impl Default for VirtualPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for VirtualPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VirtualPath> for String {
    fn from(path: VirtualPath) -> Self {
        path.0
    }
}

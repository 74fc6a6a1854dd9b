//! Flat object entries as reported by a listing

use serde::{Deserialize, Serialize};

/// A single object in a bucket
///
/// `key` is the full `/`-delimited key without a leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Full object key
    pub key: String,
    /// Object size in bytes
    pub size: u64,
}

impl ObjectEntry {
    /// Creates a new object entry
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = ObjectEntry::new("logs/2024/app.log", 512);
        assert_eq!(entry.key, "logs/2024/app.log");
        assert_eq!(entry.size, 512);
    }
}

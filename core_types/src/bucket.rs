//! Bucket names

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when accepting a bucket name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BucketNameError {
    /// Name is empty after trimming
    #[error("Bucket name is empty")]
    Empty,

    /// Name contains a character no bucket name may contain
    #[error("Bucket name {name:?} contains invalid character {found:?}")]
    InvalidCharacter { name: String, found: char },
}

/// Name of a bucket the user selected or typed
///
/// Surrounding whitespace is trimmed. Slashes and interior whitespace are
/// rejected; everything else is left for the backend to judge, since users
/// may type names of buckets they cannot enumerate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BucketName(String);

impl BucketName {
    /// Validates and creates a bucket name
    pub fn new(name: impl AsRef<str>) -> Result<Self, BucketNameError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BucketNameError::Empty);
        }
        if let Some(found) = trimmed.chars().find(|c| *c == '/' || c.is_whitespace()) {
            return Err(BucketNameError::InvalidCharacter {
                name: trimmed.to_string(),
                found,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BucketName {
    type Error = BucketNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BucketName> for String {
    fn from(name: BucketName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bucket_name() {
        let name = BucketName::new("my-data.bucket").unwrap();
        assert_eq!(name.as_str(), "my-data.bucket");
    }

    #[test]
    fn test_bucket_name_is_trimmed() {
        let name = BucketName::new("  logs \n").unwrap();
        assert_eq!(name.as_str(), "logs");
    }

    #[test]
    fn test_empty_bucket_name() {
        assert_eq!(BucketName::new(""), Err(BucketNameError::Empty));
        assert_eq!(BucketName::new("   "), Err(BucketNameError::Empty));
    }

    #[test]
    fn test_bucket_name_with_slash() {
        let result = BucketName::new("logs/2024");
        assert!(matches!(
            result,
            Err(BucketNameError::InvalidCharacter { found: '/', .. })
        ));
    }

    #[test]
    fn test_bucket_name_with_inner_space() {
        let result = BucketName::new("my logs");
        assert!(matches!(
            result,
            Err(BucketNameError::InvalidCharacter { found: ' ', .. })
        ));
    }

    #[test]
    fn test_bucket_name_deserialize_validates() {
        let ok: BucketName = serde_json::from_str("\"reports\"").unwrap();
        assert_eq!(ok.as_str(), "reports");

        let bad: Result<BucketName, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}

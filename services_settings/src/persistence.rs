//! Settings persistence layer
//!
//! This module handles loading and saving settings overrides.
//! All operations are deterministic and safe against corruption.

use crate::{SettingKey, SettingValue, SettingsError, SettingsRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Serializable container for settings overrides
/// Uses BTreeMap for stable ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsOverridesData {
    /// Version of the settings format
    pub version: u32,
    /// Overrides by key
    pub overrides: BTreeMap<String, SettingValue>,
}

impl SettingsOverridesData {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates a new empty settings data
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            overrides: BTreeMap::new(),
        }
    }

    /// Creates settings data from registry overrides
    pub fn from_overrides(overrides: &BTreeMap<SettingKey, SettingValue>) -> Self {
        let mut data = Self::new();
        for (key, value) in overrides {
            data.overrides
                .insert(key.as_str().to_string(), value.clone());
        }
        data
    }

    /// Converts settings data to registry overrides
    pub fn to_overrides(&self) -> BTreeMap<SettingKey, SettingValue> {
        self.overrides
            .iter()
            .map(|(key, value)| (SettingKey::new(key.as_str()), value.clone()))
            .collect()
    }
}

impl Default for SettingsOverridesData {
    fn default() -> Self {
        Self::new()
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Failed to serialize settings
    #[error("Failed to serialize settings: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize settings
    #[error("Failed to deserialize settings: {0}")]
    DeserializationFailed(String),

    /// Unsupported settings version
    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),

    /// Stored overrides do not fit the registry
    #[error("Stored settings rejected: {0}")]
    Rejected(#[from] SettingsError),

    /// Reading or writing the settings file failed
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes settings overrides to JSON bytes
pub fn serialize_overrides(data: &SettingsOverridesData) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec_pretty(data)
        .map_err(|e| PersistenceError::SerializationFailed(e.to_string()))
}

/// Deserializes settings overrides from JSON bytes
pub fn deserialize_overrides(bytes: &[u8]) -> PersistenceResult<SettingsOverridesData> {
    let data: SettingsOverridesData = serde_json::from_slice(bytes)
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

    if data.version != SettingsOverridesData::CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(data.version));
    }

    Ok(data)
}

/// Attempts to load settings from bytes, falling back to no overrides on error
pub fn load_overrides_safe(bytes: &[u8]) -> SettingsOverridesData {
    deserialize_overrides(bytes).unwrap_or_else(|_| SettingsOverridesData::new())
}

/// Writes the registry's overrides to `path`
pub fn save_to_path(registry: &SettingsRegistry, path: &Path) -> PersistenceResult<()> {
    let data = SettingsOverridesData::from_overrides(&registry.export_overrides());
    let bytes = serialize_overrides(&data)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Loads overrides from `path` into the registry
///
/// A missing file leaves the registry untouched.
pub fn load_from_path(registry: &mut SettingsRegistry, path: &Path) -> PersistenceResult<()> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    let data = deserialize_overrides(&bytes)?;
    registry.import_overrides(data.to_overrides())?;
    Ok(())
}

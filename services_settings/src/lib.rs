//! # Settings Registry Service
//!
//! A typed settings system for the bucket browser.
//!
//! ## Philosophy
//!
//! - **Typed settings**: All settings have explicit types, not stringly-typed
//! - **Layered**: Read-only defaults + overrides
//! - **Deterministic**: Settings are serializable and reproducible
//! - **Testable**: All settings logic can be tested independently
//!
//! ## Features
//!
//! - Read-only defaults baked in (backend address, preview limits, display precision)
//! - Overrides are type-checked against the default they replace
//! - [`BrowserSettings`] is the typed snapshot other crates consume
//! - Overrides persist as versioned JSON (see [`persistence`])
//!
//! ## Example
//!
//! ```
//! use services_settings::{create_default_registry, keys, SettingValue};
//!
//! let mut registry = create_default_registry();
//! registry
//!     .set_override(keys::PREVIEW_MAX_ROWS, SettingValue::Integer(25))
//!     .unwrap();
//!
//! let settings = registry.snapshot().unwrap();
//! assert_eq!(settings.preview_max_rows, 25);
//! ```

pub mod persistence;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Setting key (path-like identifier)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SettingKey(String);

impl SettingKey {
    /// Creates a new setting key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks if this key starts with the given prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SettingKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Setting value (strongly typed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValue {
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// String value
    String(String),
}

impl SettingValue {
    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Boolean(_) => "boolean",
            SettingValue::Integer(_) => "integer",
            SettingValue::String(_) => "string",
        }
    }

    /// Tries to get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            SettingValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    fn same_type(&self, other: &SettingValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Boolean(v) => write!(f, "{}", v),
            SettingValue::Integer(v) => write!(f, "{}", v),
            SettingValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// Errors raised when reading or writing settings
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// No default is registered under this key
    #[error("Unknown setting: {0}")]
    UnknownKey(SettingKey),

    /// Override does not match the type of the default
    #[error("Setting {key} expects a {expected} value, got {found}")]
    TypeMismatch {
        key: SettingKey,
        expected: &'static str,
        found: &'static str,
    },

    /// Value is outside the range the setting accepts
    #[error("Setting {key} is out of range: {value}")]
    OutOfRange { key: SettingKey, value: String },
}

/// Settings registry
#[derive(Debug, Clone)]
pub struct SettingsRegistry {
    /// Default settings (read-only)
    defaults: BTreeMap<SettingKey, SettingValue>,
    /// Overrides layered over the defaults
    overrides: BTreeMap<SettingKey, SettingValue>,
}

impl SettingsRegistry {
    /// Creates a new, empty settings registry
    pub fn new() -> Self {
        Self {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }

    /// Registers a default setting
    pub fn register_default(&mut self, key: impl Into<SettingKey>, value: SettingValue) {
        self.defaults.insert(key.into(), value);
    }

    /// Sets an override
    ///
    /// The key must have a registered default of the same type.
    pub fn set_override(
        &mut self,
        key: impl Into<SettingKey>,
        value: SettingValue,
    ) -> Result<(), SettingsError> {
        let key = key.into();
        let default = self
            .defaults
            .get(&key)
            .ok_or_else(|| SettingsError::UnknownKey(key.clone()))?;

        if !default.same_type(&value) {
            return Err(SettingsError::TypeMismatch {
                key,
                expected: default.type_name(),
                found: value.type_name(),
            });
        }

        self.overrides.insert(key, value);
        Ok(())
    }

    /// Removes an override, returning true if one existed
    pub fn remove_override(&mut self, key: &SettingKey) -> bool {
        self.overrides.remove(key).is_some()
    }

    /// Gets the effective setting value (override or default)
    pub fn get(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.overrides.get(key).or_else(|| self.defaults.get(key))
    }

    /// Gets the default value for a setting
    pub fn get_default(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.defaults.get(key)
    }

    /// Returns all default setting keys
    pub fn list_defaults(&self) -> Vec<SettingKey> {
        self.defaults.keys().cloned().collect()
    }

    /// Returns all effective settings with a given prefix
    pub fn list_with_prefix(&self, prefix: &str) -> Vec<(SettingKey, SettingValue)> {
        self.defaults
            .keys()
            .filter(|key| key.starts_with(prefix))
            .filter_map(|key| self.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }

    /// Exports all overrides for persistence
    pub fn export_overrides(&self) -> BTreeMap<SettingKey, SettingValue> {
        self.overrides.clone()
    }

    /// Imports overrides, replacing existing ones
    ///
    /// Every override is validated; on error nothing is replaced.
    pub fn import_overrides(
        &mut self,
        overrides: BTreeMap<SettingKey, SettingValue>,
    ) -> Result<(), SettingsError> {
        let mut staged = self.clone();
        staged.overrides.clear();
        for (key, value) in overrides {
            staged.set_override(key, value)?;
        }
        self.overrides = staged.overrides;
        Ok(())
    }

    /// Builds the typed snapshot of the effective settings
    pub fn snapshot(&self) -> Result<BrowserSettings, SettingsError> {
        Ok(BrowserSettings {
            backend_base_url: self.string(keys::BACKEND_BASE_URL)?,
            preview_max_bytes: self.count(keys::PREVIEW_MAX_BYTES, 1)?,
            preview_max_rows: self.count(keys::PREVIEW_MAX_ROWS, 0)?,
            size_precision: self.count(keys::DISPLAY_SIZE_PRECISION, 0)?,
            log_history_limit: self.count(keys::LOG_HISTORY_LIMIT, 1)?,
            dedupe_keys: self.boolean(keys::LISTING_DEDUPE_KEYS)?,
        })
    }

    fn lookup(&self, key: &str) -> Result<(SettingKey, &SettingValue), SettingsError> {
        let key = SettingKey::new(key);
        let value = self
            .get(&key)
            .ok_or_else(|| SettingsError::UnknownKey(key.clone()))?;
        Ok((key, value))
    }

    fn string(&self, key: &str) -> Result<String, SettingsError> {
        let (key, value) = self.lookup(key)?;
        value
            .as_string()
            .map(str::to_string)
            .ok_or(SettingsError::TypeMismatch {
                key,
                expected: "string",
                found: value.type_name(),
            })
    }

    fn boolean(&self, key: &str) -> Result<bool, SettingsError> {
        let (key, value) = self.lookup(key)?;
        value.as_boolean().ok_or(SettingsError::TypeMismatch {
            key,
            expected: "boolean",
            found: value.type_name(),
        })
    }

    fn count(&self, key: &str, min: i64) -> Result<usize, SettingsError> {
        let (key, value) = self.lookup(key)?;
        let raw = value.as_integer().ok_or_else(|| SettingsError::TypeMismatch {
            key: key.clone(),
            expected: "integer",
            found: value.type_name(),
        })?;
        if raw < min {
            return Err(SettingsError::OutOfRange {
                key,
                value: raw.to_string(),
            });
        }
        usize::try_from(raw).map_err(|_| SettingsError::OutOfRange {
            key,
            value: raw.to_string(),
        })
    }
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed view of the effective settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Base URL of the storage backend
    pub backend_base_url: String,
    /// Largest preview text kept, in bytes
    pub preview_max_bytes: usize,
    /// Data rows shown under the preview header
    pub preview_max_rows: usize,
    /// Decimal places in formatted sizes
    pub size_precision: usize,
    /// Log entries kept in memory
    pub log_history_limit: usize,
    /// Drop repeated keys from listing responses
    pub dedupe_keys: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            backend_base_url: defaults::BACKEND_BASE_URL.to_string(),
            preview_max_bytes: defaults::PREVIEW_MAX_BYTES,
            preview_max_rows: defaults::PREVIEW_MAX_ROWS,
            size_precision: defaults::DISPLAY_SIZE_PRECISION,
            log_history_limit: defaults::LOG_HISTORY_LIMIT,
            dedupe_keys: defaults::LISTING_DEDUPE_KEYS,
        }
    }
}

/// Setting keys
pub mod keys {
    pub const BACKEND_BASE_URL: &str = "backend.base_url";
    pub const PREVIEW_MAX_BYTES: &str = "preview.max_bytes";
    pub const PREVIEW_MAX_ROWS: &str = "preview.max_rows";
    pub const DISPLAY_SIZE_PRECISION: &str = "display.size_precision";
    pub const LOG_HISTORY_LIMIT: &str = "log.history_limit";
    pub const LISTING_DEDUPE_KEYS: &str = "listing.dedupe_keys";
}

/// Baked-in default values
pub mod defaults {
    pub const BACKEND_BASE_URL: &str = "http://localhost:8000";
    pub const PREVIEW_MAX_BYTES: usize = 10_000;
    pub const PREVIEW_MAX_ROWS: usize = 10;
    pub const DISPLAY_SIZE_PRECISION: usize = 2;
    pub const LOG_HISTORY_LIMIT: usize = 100;
    pub const LISTING_DEDUPE_KEYS: bool = true;
}

/// Creates a settings registry with default settings
pub fn create_default_registry() -> SettingsRegistry {
    let mut registry = SettingsRegistry::new();

    registry.register_default(
        keys::BACKEND_BASE_URL,
        SettingValue::String(defaults::BACKEND_BASE_URL.to_string()),
    );

    // Preview settings
    registry.register_default(
        keys::PREVIEW_MAX_BYTES,
        SettingValue::Integer(defaults::PREVIEW_MAX_BYTES as i64),
    );
    registry.register_default(
        keys::PREVIEW_MAX_ROWS,
        SettingValue::Integer(defaults::PREVIEW_MAX_ROWS as i64),
    );

    registry.register_default(
        keys::DISPLAY_SIZE_PRECISION,
        SettingValue::Integer(defaults::DISPLAY_SIZE_PRECISION as i64),
    );
    registry.register_default(
        keys::LOG_HISTORY_LIMIT,
        SettingValue::Integer(defaults::LOG_HISTORY_LIMIT as i64),
    );
    registry.register_default(
        keys::LISTING_DEDUPE_KEYS,
        SettingValue::Boolean(defaults::LISTING_DEDUPE_KEYS),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_key_starts_with() {
        let key = SettingKey::new("preview.max_rows");
        assert!(key.starts_with("preview"));
        assert!(key.starts_with("preview.max"));
        assert!(!key.starts_with("backend"));
    }

    #[test]
    fn test_setting_value_accessors() {
        let val = SettingValue::Integer(42);
        assert_eq!(val.as_integer(), Some(42));
        assert_eq!(val.as_boolean(), None);
        assert_eq!(val.type_name(), "integer");

        let val = SettingValue::String("x".to_string());
        assert_eq!(val.as_string(), Some("x"));
        assert_eq!(val.as_integer(), None);
    }

    #[test]
    fn test_default_registry_snapshot_matches_defaults() {
        let registry = create_default_registry();
        assert_eq!(registry.snapshot().unwrap(), BrowserSettings::default());
    }

    #[test]
    fn test_default_values() {
        let settings = BrowserSettings::default();
        assert_eq!(settings.backend_base_url, "http://localhost:8000");
        assert_eq!(settings.preview_max_bytes, 10_000);
        assert_eq!(settings.preview_max_rows, 10);
        assert_eq!(settings.size_precision, 2);
        assert!(settings.dedupe_keys);
    }

    #[test]
    fn test_override_takes_precedence() {
        let mut registry = create_default_registry();
        registry
            .set_override(
                keys::BACKEND_BASE_URL,
                SettingValue::String("https://browse.internal".to_string()),
            )
            .unwrap();

        let key = SettingKey::new(keys::BACKEND_BASE_URL);
        assert_eq!(
            registry.get(&key),
            Some(&SettingValue::String("https://browse.internal".to_string()))
        );
        assert_eq!(
            registry.get_default(&key),
            Some(&SettingValue::String("http://localhost:8000".to_string()))
        );
    }

    #[test]
    fn test_override_unknown_key() {
        let mut registry = create_default_registry();
        let result = registry.set_override("nope", SettingValue::Integer(1));
        assert_eq!(result, Err(SettingsError::UnknownKey(SettingKey::new("nope"))));
    }

    #[test]
    fn test_override_type_mismatch() {
        let mut registry = create_default_registry();
        let result = registry.set_override(keys::PREVIEW_MAX_ROWS, SettingValue::Boolean(true));
        assert!(matches!(
            result,
            Err(SettingsError::TypeMismatch {
                expected: "integer",
                found: "boolean",
                ..
            })
        ));
    }

    #[test]
    fn test_snapshot_rejects_out_of_range() {
        let mut registry = create_default_registry();
        registry
            .set_override(keys::PREVIEW_MAX_BYTES, SettingValue::Integer(0))
            .unwrap();
        assert!(matches!(
            registry.snapshot(),
            Err(SettingsError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_remove_override() {
        let mut registry = create_default_registry();
        let key = SettingKey::new(keys::PREVIEW_MAX_ROWS);
        registry
            .set_override(key.clone(), SettingValue::Integer(3))
            .unwrap();
        assert!(registry.remove_override(&key));
        assert!(!registry.remove_override(&key));
        assert_eq!(registry.snapshot().unwrap().preview_max_rows, 10);
    }

    #[test]
    fn test_list_with_prefix() {
        let mut registry = create_default_registry();
        registry
            .set_override(keys::PREVIEW_MAX_ROWS, SettingValue::Integer(4))
            .unwrap();

        let preview = registry.list_with_prefix("preview.");
        assert_eq!(preview.len(), 2);
        assert!(preview.contains(&(
            SettingKey::new(keys::PREVIEW_MAX_ROWS),
            SettingValue::Integer(4)
        )));
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let mut registry = create_default_registry();
        registry
            .set_override(keys::PREVIEW_MAX_ROWS, SettingValue::Integer(4))
            .unwrap();

        let mut bad = BTreeMap::new();
        bad.insert(SettingKey::new(keys::PREVIEW_MAX_BYTES), SettingValue::Integer(500));
        bad.insert(SettingKey::new("unknown.key"), SettingValue::Integer(1));

        assert!(registry.import_overrides(bad).is_err());
        assert_eq!(registry.export_overrides().len(), 1);
        assert_eq!(registry.snapshot().unwrap().preview_max_bytes, 10_000);
    }

    #[test]
    fn test_list_defaults() {
        let registry = create_default_registry();
        assert_eq!(registry.list_defaults().len(), 6);
    }
}

//! # Logger Service
//!
//! This crate implements structured logging for the browser components.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Components receive a [`Logger`] handle when they are constructed; there is
//! no global logger. Entries are kept in a bounded in-memory history so tests
//! and hosts can inspect exactly what happened.

use core_types::RequestId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Default number of entries kept before the oldest are dropped
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Component that produced the entry
    pub component: String,
    /// Request this entry belongs to (if any)
    pub source: Option<RequestId>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            component: component.into(),
            source: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the source request
    pub fn with_source(mut self, source: RequestId) -> Self {
        self.source = Some(source);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a field value by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.component, self.message)?;
        if let Some(source) = self.source {
            write!(f, " request={}", source.as_uuid())?;
        }
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct History {
    entries: VecDeque<LogEntry>,
    limit: usize,
}

/// Cloneable handle to a shared, bounded log history
///
/// Clones share the same history. Entries below the minimum level are
/// dropped on the floor.
#[derive(Debug, Clone)]
pub struct Logger {
    component: String,
    min_level: LogLevel,
    history: Arc<Mutex<History>>,
}

impl Logger {
    /// Creates a logger for the given component with the default history size
    pub fn new(component: impl Into<String>) -> Self {
        Self::with_limit(component, DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a logger keeping at most `limit` entries
    pub fn with_limit(component: impl Into<String>, limit: usize) -> Self {
        Self {
            component: component.into(),
            min_level: LogLevel::Debug,
            history: Arc::new(Mutex::new(History {
                entries: VecDeque::new(),
                limit: limit.max(1),
            })),
        }
    }

    /// Returns a handle for another component sharing this history
    pub fn for_component(&self, component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            min_level: self.min_level,
            history: Arc::clone(&self.history),
        }
    }

    /// Sets the minimum level recorded through this handle
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Component name entries are attributed to
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Starts an entry attributed to this handle's component
    pub fn entry(&self, level: LogLevel, message: impl Into<String>) -> LogEntry {
        LogEntry::new(level, self.component.clone(), message)
    }

    /// Records a fully built entry
    pub fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let mut history = self.lock();
        if history.entries.len() == history.limit {
            history.entries.pop_front();
        }
        history.entries.push_back(entry);
    }

    /// Records a debug message
    pub fn debug(&self, message: impl Into<String>) {
        self.log(self.entry(LogLevel::Debug, message));
    }

    /// Records an informational message
    pub fn info(&self, message: impl Into<String>) {
        self.log(self.entry(LogLevel::Info, message));
    }

    /// Records a warning
    pub fn warn(&self, message: impl Into<String>) {
        self.log(self.entry(LogLevel::Warn, message));
    }

    /// Records an error
    pub fn error(&self, message: impl Into<String>) {
        self.log(self.entry(LogLevel::Error, message));
    }

    /// Snapshot of the recorded entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Snapshot of entries at or above `level`
    pub fn entries_at_least(&self, level: LogLevel) -> Vec<LogEntry> {
        self.lock()
            .entries
            .iter()
            .filter(|entry| entry.level >= level)
            .cloned()
            .collect()
    }

    /// Drops every recorded entry
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("bucketview")
    }
}

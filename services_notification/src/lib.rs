//! # Notification Service
//!
//! Provides scoped, dismissable messages for the browser components.
//!
//! ## Philosophy
//!
//! - **Structured, not stdout**: Notifications are typed events, not print statements
//! - **Scoped**: Every message belongs to the component that issued the failing request
//! - **Dismissable**: Users clear messages; nothing is fatal to the session
//! - **Testable**: Notification history can be inspected
//!
//! ## Example
//!
//! ```
//! use services_notification::{ComponentScope, Notification, Notifier};
//!
//! let notifier = Notifier::new();
//! let id = notifier.notify(Notification::error(
//!     ComponentScope::Browser,
//!     "Failed to fetch bucket contents",
//! ));
//!
//! assert_eq!(notifier.active(ComponentScope::Browser).len(), 1);
//! notifier.dismiss(id);
//! assert!(notifier.active(ComponentScope::Browser).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Maximum number of notifications to keep in history
pub const MAX_NOTIFICATION_HISTORY: usize = 100;

/// Unique identifier for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new notification ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notif:{}", self.0)
    }
}

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotificationLevel {
    /// Informational message
    Info,
    /// Degraded but usable
    Warning,
    /// A request failed
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "INFO"),
            NotificationLevel::Warning => write!(f, "WARNING"),
            NotificationLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Screen region a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentScope {
    /// Credential form
    Credentials,
    /// Bucket chooser
    BucketSelect,
    /// Folder listing
    Browser,
    /// File preview pane
    Preview,
}

impl fmt::Display for ComponentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentScope::Credentials => write!(f, "credentials"),
            ComponentScope::BucketSelect => write!(f, "bucket-select"),
            ComponentScope::Browser => write!(f, "browser"),
            ComponentScope::Preview => write!(f, "preview"),
        }
    }
}

/// A notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier
    pub id: NotificationId,
    /// Notification level
    pub level: NotificationLevel,
    /// Component the message is shown in
    pub scope: ComponentScope,
    /// Message text
    pub message: String,
    /// Whether the notification has been dismissed
    pub dismissed: bool,
}

impl Notification {
    /// Creates a new notification
    pub fn new(level: NotificationLevel, scope: ComponentScope, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            level,
            scope,
            message: message.into(),
            dismissed: false,
        }
    }

    /// Creates an info notification
    pub fn info(scope: ComponentScope, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, scope, message)
    }

    /// Creates a warning notification
    pub fn warning(scope: ComponentScope, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, scope, message)
    }

    /// Creates an error notification
    pub fn error(scope: ComponentScope, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, scope, message)
    }

    /// Dismisses the notification
    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }
}

/// Notification history
#[derive(Debug, Default)]
pub struct NotificationService {
    /// All notifications (including dismissed ones)
    notifications: VecDeque<Notification>,
}

impl NotificationService {
    /// Creates a new notification service
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
        }
    }

    /// Sends a notification, returning its ID
    pub fn notify(&mut self, notification: Notification) -> NotificationId {
        let id = notification.id;
        self.notifications.push_back(notification);

        while self.notifications.len() > MAX_NOTIFICATION_HISTORY {
            self.notifications.pop_front();
        }
        id
    }

    /// Returns active (non-dismissed) notifications for a scope, oldest first
    pub fn active(&self, scope: ComponentScope) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.scope == scope && !n.dismissed)
            .collect()
    }

    /// Returns all recent notifications (including dismissed ones), newest first
    pub fn recent(&self, limit: usize) -> Vec<&Notification> {
        self.notifications.iter().rev().take(limit).collect()
    }

    /// Dismisses a notification by ID
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) {
            notification.dismiss();
            true
        } else {
            false
        }
    }

    /// Dismisses every active notification in a scope, returning how many
    pub fn dismiss_scope(&mut self, scope: ComponentScope) -> usize {
        let mut count = 0;
        for notification in self
            .notifications
            .iter_mut()
            .filter(|n| n.scope == scope && !n.dismissed)
        {
            notification.dismiss();
            count += 1;
        }
        count
    }

    /// Clears all notifications from history
    pub fn clear_all(&mut self) {
        self.notifications.clear();
    }

    /// Returns the total number of notifications in history
    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }
}

/// Cloneable handle to a shared [`NotificationService`]
///
/// Components are given a Notifier at construction; clones share history.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    service: Arc<Mutex<NotificationService>>,
}

impl Notifier {
    /// Creates a notifier over a fresh service
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends a notification, returning its ID
    pub fn notify(&self, notification: Notification) -> NotificationId {
        self.lock().notify(notification)
    }

    /// Snapshot of the active notifications for a scope
    pub fn active(&self, scope: ComponentScope) -> Vec<Notification> {
        self.lock().active(scope).into_iter().cloned().collect()
    }

    /// Most recent active message for a scope
    pub fn latest(&self, scope: ComponentScope) -> Option<Notification> {
        self.lock().active(scope).last().map(|n| (*n).clone())
    }

    /// Dismisses a notification by ID
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.lock().dismiss(id)
    }

    /// Dismisses every active notification in a scope
    pub fn dismiss_scope(&self, scope: ComponentScope) -> usize {
        self.lock().dismiss_scope(scope)
    }

    /// Total notifications kept, dismissed included
    pub fn notification_count(&self) -> usize {
        self.lock().notification_count()
    }

    fn lock(&self) -> MutexGuard<'_, NotificationService> {
        self.service.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_id_creation() {
        let id1 = NotificationId::new();
        let id2 = NotificationId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_notification_level_ordering() {
        assert!(NotificationLevel::Info < NotificationLevel::Warning);
        assert!(NotificationLevel::Warning < NotificationLevel::Error);
    }

    #[test]
    fn test_notification_creation() {
        let notif = Notification::error(ComponentScope::Preview, "Failed to fetch file preview");

        assert_eq!(notif.level, NotificationLevel::Error);
        assert_eq!(notif.scope, ComponentScope::Preview);
        assert_eq!(notif.message, "Failed to fetch file preview");
        assert!(!notif.dismissed);
    }

    #[test]
    fn test_service_active_is_scoped() {
        let mut service = NotificationService::new();
        service.notify(Notification::error(ComponentScope::Browser, "listing"));
        service.notify(Notification::error(ComponentScope::Preview, "preview"));

        let browser = service.active(ComponentScope::Browser);
        assert_eq!(browser.len(), 1);
        assert_eq!(browser[0].message, "listing");
        assert!(service.active(ComponentScope::Credentials).is_empty());
    }

    #[test]
    fn test_service_dismiss() {
        let mut service = NotificationService::new();
        let id = service.notify(Notification::warning(ComponentScope::BucketSelect, "x"));

        assert!(service.dismiss(id));
        assert!(service.active(ComponentScope::BucketSelect).is_empty());
        assert_eq!(service.notification_count(), 1);
    }

    #[test]
    fn test_service_dismiss_nonexistent() {
        let mut service = NotificationService::new();
        assert!(!service.dismiss(NotificationId::new()));
    }

    #[test]
    fn test_service_dismiss_scope_leaves_others() {
        let mut service = NotificationService::new();
        service.notify(Notification::error(ComponentScope::Browser, "a"));
        service.notify(Notification::error(ComponentScope::Browser, "b"));
        service.notify(Notification::error(ComponentScope::Preview, "c"));

        assert_eq!(service.dismiss_scope(ComponentScope::Browser), 2);
        assert!(service.active(ComponentScope::Browser).is_empty());
        assert_eq!(service.active(ComponentScope::Preview).len(), 1);
    }

    #[test]
    fn test_service_recent_newest_first() {
        let mut service = NotificationService::new();
        for i in 0..10 {
            service.notify(Notification::info(ComponentScope::Browser, format!("Test {}", i)));
        }

        let recent = service.recent(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].message, "Test 9");
    }

    #[test]
    fn test_service_max_history() {
        let mut service = NotificationService::new();
        for i in 0..(MAX_NOTIFICATION_HISTORY + 10) {
            service.notify(Notification::info(ComponentScope::Browser, format!("Test {}", i)));
        }
        assert_eq!(service.notification_count(), MAX_NOTIFICATION_HISTORY);
    }

    #[test]
    fn test_service_clear_all() {
        let mut service = NotificationService::new();
        service.notify(Notification::info(ComponentScope::Browser, "x"));
        service.clear_all();
        assert_eq!(service.notification_count(), 0);
    }

    #[test]
    fn test_notifier_clones_share_history() {
        let notifier = Notifier::new();
        let other = notifier.clone();
        other.notify(Notification::error(ComponentScope::Credentials, "Failed to verify credentials"));

        let latest = notifier.latest(ComponentScope::Credentials).unwrap();
        assert_eq!(latest.message, "Failed to verify credentials");
        assert_eq!(notifier.dismiss_scope(ComponentScope::Credentials), 1);
        assert!(other.latest(ComponentScope::Credentials).is_none());
    }

    #[test]
    fn test_notification_serializes() {
        let notif = Notification::warning(ComponentScope::BucketSelect, "manual entry");
        let json = serde_json::to_value(&notif).unwrap();
        assert_eq!(json["scope"], "BucketSelect");
        assert_eq!(json["level"], "Warning");
    }
}

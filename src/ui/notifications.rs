//! Notification Center
//!
//! Holds the most recent user-facing message. Callers of the auth manager
//! report outcomes here; a front end renders `current()` and clears it once
//! the timeout elapses.

use serde::Serialize;
use std::sync::{PoisonError, RwLock};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// How long the message stays up unless dismissed
    pub fn default_timeout_ms(self) -> u64 {
        match self {
            NotificationKind::Success => 4000,
            NotificationKind::Error => 6000,
            NotificationKind::Warning => 5000,
            NotificationKind::Info => 4000,
        }
    }
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub timeout_ms: u64,
}

/// Last-write-wins holder for the visible notification
#[derive(Debug, Default)]
pub struct NotificationCenter {
    current: RwLock<Option<Notification>>,
}

impl NotificationCenter {
    /// Create a center with nothing shown
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible notification
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind, timeout_ms: u64) {
        let notification = Notification {
            message: message.into(),
            kind,
            timeout_ms,
        };

        match kind {
            NotificationKind::Error | NotificationKind::Warning => {
                tracing::warn!(kind = ?kind, message = %notification.message, "Notification");
            }
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(kind = ?kind, message = %notification.message, "Notification");
            }
        }

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(notification);
    }

    /// Show a success message with the default timeout
    pub fn show_success(&self, message: impl Into<String>) {
        let kind = NotificationKind::Success;
        self.show(message, kind, kind.default_timeout_ms());
    }

    /// Show an error message with the default timeout
    pub fn show_error(&self, message: impl Into<String>) {
        let kind = NotificationKind::Error;
        self.show(message, kind, kind.default_timeout_ms());
    }

    /// Show a warning with the default timeout
    pub fn show_warning(&self, message: impl Into<String>) {
        let kind = NotificationKind::Warning;
        self.show(message, kind, kind.default_timeout_ms());
    }

    /// Show an informational message with the default timeout
    pub fn show_info(&self, message: impl Into<String>) {
        let kind = NotificationKind::Info;
        self.show(message, kind, kind.default_timeout_ms());
    }

    /// The visible notification, if any
    pub fn current(&self) -> Option<Notification> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hide the visible notification
    pub fn dismiss(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

//! UI Collaborators
//!
//! The thin slice of UI state the core talks to: outcome notifications and
//! the persisted theme preference.

mod notifications;
mod theme;

pub use notifications::{Notification, NotificationCenter, NotificationKind};
pub use theme::{Theme, ThemePreference};

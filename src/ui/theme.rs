//! Theme preference, persisted in the `theme` slot

use crate::storage::{KeyValueStore, StorageResult, THEME_KEY};
use std::str::FromStr;
use std::sync::Arc;

/// Colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    /// Stored value; anything but `"dark"` reads as light
    pub fn from_stored(value: &str) -> Self {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Value written to the `theme` slot
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme {:?} (expected dark or light)", other)),
        }
    }
}

/// Reads and writes the persisted theme
#[derive(Clone)]
pub struct ThemePreference {
    storage: Arc<dyn KeyValueStore>,
}

impl ThemePreference {
    /// Create a preference backed by `storage`
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Current theme; an unreadable slot falls back to light
    pub fn load(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(value)) => Theme::from_stored(&value),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read theme preference");
                Theme::default()
            }
        }
    }

    /// Persist `theme`
    pub fn set(&self, theme: Theme) -> StorageResult<()> {
        self.storage.set(THEME_KEY, theme.as_str())?;
        tracing::debug!(%theme, "Theme saved");
        Ok(())
    }

    /// Flip and persist, returning the new theme
    pub fn toggle(&self) -> StorageResult<Theme> {
        let next = self.load().toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_from_stored() {
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
        assert_eq!(Theme::from_stored("light"), Theme::Light);
        assert_eq!(Theme::from_stored("solarized"), Theme::Light);
    }

    #[test]
    fn test_parse() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn test_preference_round_trip() {
        let storage = Arc::new(MemoryStore::new());
        let prefs = ThemePreference::new(storage.clone());
        assert_eq!(prefs.load(), Theme::Light);

        prefs.set(Theme::Dark).unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(ThemePreference::new(storage).load(), Theme::Dark);
    }

    #[test]
    fn test_toggle() {
        let prefs = ThemePreference::new(Arc::new(MemoryStore::new()));
        assert_eq!(prefs.toggle().unwrap(), Theme::Dark);
        assert_eq!(prefs.toggle().unwrap(), Theme::Light);
        assert_eq!(prefs.load(), Theme::Light);
    }
}

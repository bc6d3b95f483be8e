//! Persisted UI preferences

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use studyhub_storage::KeyValueStore;

use crate::Result;

pub const THEME_KEY: &str = "theme";
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebar_collapsed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

#[derive(Clone)]
pub struct Preferences {
    storage: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Stored theme; anything unreadable falls back to light
    pub fn theme(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored theme: {}", e);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!("Failed to read theme: {}", e);
                Theme::default()
            }
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage.set(THEME_KEY, theme.as_str())?;
        tracing::debug!(theme = theme.as_str(), "Theme saved");
        Ok(())
    }

    pub fn toggle_theme(&self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    pub fn sidebar_collapsed(&self) -> bool {
        matches!(
            self.storage.get(SIDEBAR_COLLAPSED_KEY),
            Ok(Some(ref raw)) if raw == "true"
        )
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<()> {
        self.storage
            .set(SIDEBAR_COLLAPSED_KEY, if collapsed { "true" } else { "false" })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyhub_storage::MemoryStore;

    #[test]
    fn test_theme_defaults_and_toggles() {
        let storage = MemoryStore::new();
        let prefs = Preferences::new(Arc::new(storage.clone()));
        assert_eq!(prefs.theme(), Theme::Light);

        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let storage = MemoryStore::new();
        storage.set(THEME_KEY, "solarized").unwrap();

        let prefs = Preferences::new(Arc::new(storage));
        assert_eq!(prefs.theme(), Theme::Light);
    }

    #[test]
    fn test_sidebar_flag() {
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));
        assert!(!prefs.sidebar_collapsed());

        prefs.set_sidebar_collapsed(true).unwrap();
        assert!(prefs.sidebar_collapsed());

        prefs.set_sidebar_collapsed(false).unwrap();
        assert!(!prefs.sidebar_collapsed());
    }
}

//! Light / dark / system appearance

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::style::StyleTarget;
use crate::error::Result;
use crate::storage::Settings;

/// Settings key the mode is persisted under
pub const THEME_KEY: &str = "theme";

/// User-selected appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// Resolved appearance applied to the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Translation key for the mode's label
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Light => "settings.theme_light",
            Self::Dark => "settings.theme_dark",
            Self::System => "settings.theme_system",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Light => "sun",
            Self::Dark => "moon",
            Self::System => "monitor",
        }
    }

    /// `System` follows the host preference
    pub fn resolve(self, prefers_dark: bool) -> ColorScheme {
        match self {
            Self::Light => ColorScheme::Light,
            Self::Dark => ColorScheme::Dark,
            Self::System if prefers_dark => ColorScheme::Dark,
            Self::System => ColorScheme::Light,
        }
    }

    /// Set the root class for this mode
    pub fn apply(self, prefers_dark: bool, target: &mut dyn StyleTarget) {
        target.set_color_scheme(self.resolve(prefers_dark));
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme mode: {}", other)),
        }
    }
}

/// Read the persisted mode. Missing or unreadable values fall back to
/// `System`.
pub async fn load_mode(settings: &Settings<'_>) -> Result<ThemeMode> {
    let stored = settings.get(THEME_KEY).await?;
    let mode = stored
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    Ok(mode)
}

pub async fn save_mode(settings: &Settings<'_>, mode: ThemeMode) -> Result<()> {
    settings.set(THEME_KEY, mode.as_str()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::theme::StyleSheet;

    #[test]
    fn test_resolve() {
        assert_eq!(ThemeMode::System.resolve(true), ColorScheme::Dark);
        assert_eq!(ThemeMode::System.resolve(false), ColorScheme::Light);
        assert_eq!(ThemeMode::Light.resolve(true), ColorScheme::Light);

        let mut sheet = StyleSheet::default();
        ThemeMode::Dark.apply(false, &mut sheet);
        assert_eq!(sheet.color_scheme(), Some(ColorScheme::Dark));
        ThemeMode::Light.apply(false, &mut sheet);
        assert_eq!(sheet.color_scheme(), Some(ColorScheme::Light));
    }

    #[tokio::test]
    async fn test_mode_persistence() {
        let db = Database::in_memory().await.unwrap();
        let settings = db.settings();

        assert_eq!(load_mode(&settings).await.unwrap(), ThemeMode::System);
        save_mode(&settings, ThemeMode::Dark).await.unwrap();
        assert_eq!(load_mode(&settings).await.unwrap(), ThemeMode::Dark);

        settings.set(THEME_KEY, "sepia").await.unwrap();
        assert_eq!(load_mode(&settings).await.unwrap(), ThemeMode::System);
    }
}

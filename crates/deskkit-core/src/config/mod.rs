//! Application configuration
//!
//! [`Config`] is the total configuration every component reads. Callers never
//! build one by hand: they describe what they want to change in a
//! [`PartialConfig`] and [`merge`] it onto [`Config::default()`]. A partial can
//! also come from `deskkit.toml` in the config directory.

mod merge;

pub use merge::{Merge, merge};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::storage::Migration;
use crate::ui::{LogoProps, NavItemProps, Node, Override, ShellProps, TitleBarProps};

pub use crate::i18n::I18nConfig;
pub use crate::theme::{FontConfig, Radius, ThemeColors, ThemeConfig};

/// Config file name looked up in the config directory
pub const CONFIG_FILE: &str = "deskkit.toml";

/// Total application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub brand: BrandConfig,
    pub nav: Vec<NavItem>,
    pub features: FeaturesConfig,
    pub theme: ThemeConfig,
    pub layout: LayoutConfig,
    pub slots: SlotsConfig,
    pub components: ComponentOverrides,
    pub i18n: I18nConfig,
    pub database: DatabaseConfig,
    pub sentry: SentryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brand: BrandConfig::default(),
            nav: Vec::new(),
            features: FeaturesConfig::default(),
            theme: ThemeConfig::default(),
            layout: LayoutConfig::default(),
            slots: SlotsConfig::default(),
            components: ComponentOverrides::default(),
            i18n: I18nConfig::default(),
            database: DatabaseConfig::default(),
            sentry: SentryConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrandConfig {
    /// Display name, passed through translation before rendering
    pub name: String,
    pub logo: Option<Override<LogoProps>>,
    pub version: Option<String>,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "App".to_string(),
            logo: None,
            version: None,
        }
    }
}

/// A sidebar navigation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    /// Translation key for the label
    pub title: String,
    pub path: String,
    /// Icon name resolved by the host
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

impl NavItem {
    pub fn new(title: impl Into<String>, path: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            icon: icon.into(),
            badge: None,
        }
    }

    pub fn with_badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }
}

/// Nav badge content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Badge {
    Count(i64),
    Text(String),
}

impl Badge {
    /// Empty text and zero counts are not shown
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Count(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Feature toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeaturesConfig {
    pub updater: bool,
    pub database: bool,
    pub sentry: bool,
    pub devtools: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            updater: true,
            database: true,
            sentry: false,
            devtools: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    #[default]
    Left,
    Right,
}

impl SidebarPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutConfig {
    pub sidebar: SidebarLayout,
    pub title_bar: TitleBarLayout,
    pub content: ContentLayout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarLayout {
    pub width: u32,
    pub position: SidebarPosition,
    pub collapsible: bool,
    pub default_collapsed: bool,
}

impl Default for SidebarLayout {
    fn default() -> Self {
        Self {
            width: 180,
            position: SidebarPosition::Left,
            collapsible: true,
            default_collapsed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBarLayout {
    pub height: u32,
    pub show_window_controls: bool,
    pub draggable: bool,
}

impl Default for TitleBarLayout {
    fn default() -> Self {
        Self {
            height: 40,
            show_window_controls: true,
            draggable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout {
    pub padding: u32,
    /// 0 means no limit
    pub max_width: u32,
}

impl Default for ContentLayout {
    fn default() -> Self {
        Self {
            padding: 24,
            max_width: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlotsConfig {
    pub title_bar: TitleBarSlots,
    pub sidebar: SidebarSlots,
    pub shell: ShellSlots,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleBarSlots {
    pub left: Option<Node>,
    pub center: Option<Node>,
    pub right: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidebarSlots {
    pub header: Option<Node>,
    pub footer: Option<Node>,
    pub before_nav: Option<Node>,
    pub after_nav: Option<Node>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShellSlots {
    pub before_content: Option<Node>,
    pub after_content: Option<Node>,
}

/// Replacements for built-in components
#[derive(Debug, Clone, Default)]
pub struct ComponentOverrides {
    pub shell: Option<Override<ShellProps>>,
    pub title_bar: Option<Override<TitleBarProps>>,
    pub nav_item: Option<Override<NavItemProps>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// File name under the data directory, an absolute path, or `:memory:`
    pub name: String,
    /// Applied after the built-in migrations
    pub migrations: Vec<Migration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "app.db".to_string(),
            migrations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub traces_sample_rate: Option<f32>,
    pub environment: Option<String>,
}

/// Caller overrides; every field optional
///
/// `Some` always wins over the base value, including `Some(0)`, `Some(false)`
/// and empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub brand: Option<PartialBrand>,
    pub nav: Option<Vec<NavItem>>,
    pub features: Option<PartialFeatures>,
    pub theme: Option<ThemeConfig>,
    pub layout: Option<PartialLayout>,
    #[serde(skip)]
    pub slots: Option<PartialSlots>,
    #[serde(skip)]
    pub components: Option<ComponentOverrides>,
    pub i18n: Option<I18nConfig>,
    pub database: Option<PartialDatabase>,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialBrand {
    pub name: Option<String>,
    #[serde(skip)]
    pub logo: Option<Override<LogoProps>>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialFeatures {
    pub updater: Option<bool>,
    pub database: Option<bool>,
    pub sentry: Option<bool>,
    pub devtools: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialLayout {
    pub sidebar: Option<PartialSidebar>,
    pub title_bar: Option<PartialTitleBar>,
    pub content: Option<PartialContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSidebar {
    pub width: Option<u32>,
    pub position: Option<SidebarPosition>,
    pub collapsible: Option<bool>,
    pub default_collapsed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialTitleBar {
    pub height: Option<u32>,
    pub show_window_controls: Option<bool>,
    pub draggable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialContent {
    pub padding: Option<u32>,
    pub max_width: Option<u32>,
}

/// Slot overrides; each group replaces the base group as a whole
#[derive(Debug, Clone, Default)]
pub struct PartialSlots {
    pub title_bar: Option<TitleBarSlots>,
    pub sidebar: Option<SidebarSlots>,
    pub shell: Option<ShellSlots>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialDatabase {
    pub name: Option<String>,
    pub migrations: Option<Vec<Migration>>,
}

impl PartialConfig {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("DESKKIT_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| Error::ConfigError("could not determine config directory".into()))?
                .join("deskkit")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load `deskkit.toml` from the config directory, or an empty partial if
    /// there is none
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::from_path(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        let partial = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded config file");
        Ok(partial)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let partial: PartialConfig = toml::from_str(contents)?;
        partial.validate()?;
        Ok(partial)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(rate) = self.sentry.as_ref().and_then(|s| s.traces_sample_rate) {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::ConfigError(format!(
                    "sentry.traces_sample_rate must be between 0.0 and 1.0, got {}",
                    rate
                )));
            }
        }

        if let Some(nav) = &self.nav {
            let mut seen = HashSet::new();
            for item in nav {
                if item.path.is_empty() {
                    return Err(Error::ConfigError(format!(
                        "nav entry '{}' has an empty path",
                        item.title
                    )));
                }
                if !seen.insert(item.path.as_str()) {
                    return Err(Error::ConfigError(format!(
                        "duplicate nav path: {}",
                        item.path
                    )));
                }
            }
        }

        Ok(())
    }

    /// Stack `top` over `self` with the same rules as [`merge`]
    pub fn overlay(self, top: PartialConfig) -> PartialConfig {
        self.merge(top)
    }
}

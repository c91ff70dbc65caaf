//! Theme configuration and its style side effect
//!
//! [`apply_theme`] writes CSS custom properties onto a [`StyleTarget`]. Keys
//! absent from the config are left alone, so applying the same theme twice
//! or in a different key order gives the same result.

pub mod mode;
mod style;

pub use mode::{ColorScheme, ThemeMode};
pub use style::{StyleSheet, StyleTarget, ThemeEffect};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub colors: Option<ThemeColors>,
    pub radius: Option<Radius>,
    pub font: Option<FontConfig>,
    /// Extra custom properties, applied verbatim
    pub css_variables: Option<BTreeMap<String, String>>,
}

/// Named colour tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub muted: Option<String>,
    pub muted_foreground: Option<String>,
    pub border: Option<String>,
    pub ring: Option<String>,
    pub accent: Option<String>,
    pub accent_foreground: Option<String>,
    pub destructive: Option<String>,
    pub destructive_foreground: Option<String>,
}

impl ThemeColors {
    /// Defined colours as `(css property, value)` pairs
    pub fn variables(&self) -> Vec<(&'static str, &str)> {
        [
            ("--primary", &self.primary),
            ("--secondary", &self.secondary),
            ("--background", &self.background),
            ("--foreground", &self.foreground),
            ("--muted", &self.muted),
            ("--muted-foreground", &self.muted_foreground),
            ("--border", &self.border),
            ("--ring", &self.ring),
            ("--accent", &self.accent),
            ("--accent-foreground", &self.accent_foreground),
            ("--destructive", &self.destructive),
            ("--destructive-foreground", &self.destructive_foreground),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

/// Border radius preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radius {
    None,
    Sm,
    Md,
    Lg,
    Full,
}

impl Radius {
    pub fn css_value(&self) -> &'static str {
        match self {
            Self::None => "0",
            Self::Sm => "0.25rem",
            Self::Md => "0.5rem",
            Self::Lg => "0.75rem",
            Self::Full => "9999px",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub sans: Option<String>,
    pub mono: Option<String>,
}

/// Write the theme onto `target`
pub fn apply_theme(theme: &ThemeConfig, target: &mut dyn StyleTarget) {
    if let Some(colors) = &theme.colors {
        for (name, value) in colors.variables() {
            target.set_property(name, value);
        }
    }

    if let Some(radius) = theme.radius {
        target.set_property("--radius", radius.css_value());
    }

    if let Some(font) = &theme.font {
        if let Some(sans) = &font.sans {
            target.set_property("--font-sans", sans);
            target.set_font_family(sans);
        }
        if let Some(mono) = &font.mono {
            target.set_property("--font-mono", mono);
        }
    }

    if let Some(vars) = &theme.css_variables {
        for (key, value) in vars {
            target.set_property(&normalize_variable(key), value);
        }
    }
}

fn normalize_variable(key: &str) -> String {
    if key.starts_with("--") {
        key.to_string()
    } else {
        format!("--{}", key)
    }
}

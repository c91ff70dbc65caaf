use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, Weak};

use super::mode::ColorScheme;
use super::apply_theme;
use crate::config::Config;

/// Where theme properties end up
///
/// A webview host forwards these to the document root. [`StyleSheet`] keeps
/// them in memory.
pub trait StyleTarget {
    fn set_property(&mut self, name: &str, value: &str);

    fn set_font_family(&mut self, family: &str);

    /// Replace the `light`/`dark` root class
    fn set_color_scheme(&mut self, scheme: ColorScheme);
}

/// In-memory global style target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    properties: BTreeMap<String, String>,
    font_family: Option<String>,
    color_scheme: Option<ColorScheme>,
}

impl StyleSheet {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    pub fn color_scheme(&self) -> Option<ColorScheme> {
        self.color_scheme
    }

    /// Render as a `:root` rule for injection into a document
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.properties {
            let _ = writeln!(css, "  {}: {};", name, value);
        }
        if let Some(family) = &self.font_family {
            let _ = writeln!(css, "  font-family: {};", family);
        }
        if let Some(scheme) = self.color_scheme {
            let _ = writeln!(css, "  color-scheme: {};", scheme.as_str());
        }
        css.push('}');
        css
    }
}

impl StyleTarget for StyleSheet {
    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    fn set_font_family(&mut self, family: &str) {
        self.font_family = Some(family.to_string());
    }

    fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = Some(scheme);
    }
}

/// Re-applies the theme only when the config instance changes
#[derive(Debug, Default)]
pub struct ThemeEffect {
    applied: Option<Weak<Config>>,
}

impl ThemeEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the theme was applied
    pub fn run(&mut self, config: &Arc<Config>, target: &mut dyn StyleTarget) -> bool {
        if let Some(previous) = &self.applied {
            if Weak::ptr_eq(previous, &Arc::downgrade(config)) {
                return false;
            }
        }
        apply_theme(&config.theme, target);
        self.applied = Some(Arc::downgrade(config));
        tracing::debug!("theme applied");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PartialConfig, merge};
    use crate::theme::{Radius, ThemeConfig};

    #[test]
    fn test_effect_runs_once_per_config() {
        let config = Arc::new(merge(
            Config::default(),
            PartialConfig {
                theme: Some(ThemeConfig {
                    radius: Some(Radius::Full),
                    ..Default::default()
                }),
                ..Default::default()
            },
        ));
        let mut effect = ThemeEffect::new();
        let mut sheet = StyleSheet::default();

        assert!(effect.run(&config, &mut sheet));
        assert!(!effect.run(&Arc::clone(&config), &mut sheet));

        let replaced = Arc::new((*config).clone());
        assert!(effect.run(&replaced, &mut sheet));
        assert_eq!(sheet.property("--radius"), Some("9999px"));
    }

    #[test]
    fn test_to_css() {
        let mut sheet = StyleSheet::default();
        sheet.set_property("--radius", "0");
        sheet.set_color_scheme(ColorScheme::Dark);
        assert_eq!(sheet.to_css(), ":root {\n  --radius: 0;\n  color-scheme: dark;\n}");
    }
}

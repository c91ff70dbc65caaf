//! Translations
//!
//! The core ships `en` and `zh` tables for its own strings. Apps add their
//! tables through [`I18nConfig::resources`]; they are deep-merged over the
//! built-in ones so an app can override single keys.

mod catalog;
mod locale;

pub use catalog::{Catalog, TranslationEngine};
pub use locale::{detect_system_language, normalize_locale};

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Language used when a key is missing in the active one
pub const FALLBACK_LANGUAGE: &str = "en";

/// Settings key the chosen language is persisted under
pub const LANGUAGE_KEY: &str = "language";

/// Translation tables keyed by language code
pub type Resources = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    pub default_language: Option<String>,
    pub supported_languages: Option<Vec<String>>,
    pub resources: Option<Resources>,
}

/// The built-in `en` and `zh` tables
pub fn base_resources() -> Result<Resources> {
    let mut resources = Resources::new();
    resources.insert("en".into(), serde_json::from_str(include_str!("../../locales/en.json"))?);
    resources.insert("zh".into(), serde_json::from_str(include_str!("../../locales/zh.json"))?);
    Ok(resources)
}

/// Recursively merge `source` into `target`
///
/// Objects merge key by key; any other value replaces what was there.
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value)
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Deep-merge app tables over `base`. New languages are added as is.
pub fn merge_resources(mut base: Resources, app: Resources) -> Result<Resources> {
    for (language, table) in app {
        if !table.is_object() {
            return Err(Error::InvalidResources(language));
        }
        match base.get_mut(&language) {
            Some(existing) => deep_merge(existing, table),
            None => {
                base.insert(language, table);
            }
        }
    }
    Ok(base)
}

/// Display name for a language code
pub fn language_label(code: &str) -> String {
    match code {
        "en" => "English",
        "zh" => "中文",
        "ja" => "日本語",
        "ko" => "한국어",
        "fr" => "Français",
        "de" => "Deutsch",
        "es" => "Español",
        other => other,
    }
    .to_string()
}

/// Active translations for the app
pub struct I18n {
    engine: Box<dyn TranslationEngine>,
    supported: Vec<String>,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("language", &self.engine.language())
            .field("supported", &self.supported)
            .finish()
    }
}

impl I18n {
    /// Set up the built-in [`Catalog`] from the config
    pub fn bootstrap(config: &I18nConfig) -> Result<Self> {
        Self::with_engine(Box::new(Catalog::new()), config)
    }

    /// Set up a host-provided engine from the config
    ///
    /// The starting language is `default_language`, else the system locale
    /// when it is supported, else `en`.
    pub fn with_engine(mut engine: Box<dyn TranslationEngine>, config: &I18nConfig) -> Result<Self> {
        let resources = merge_resources(base_resources()?, config.resources.clone().unwrap_or_default())?;

        let supported = match &config.supported_languages {
            Some(languages) if !languages.is_empty() => languages.clone(),
            _ => resources.keys().cloned().collect(),
        };

        let language = match &config.default_language {
            Some(language) => language.clone(),
            None => pick_language(&detect_system_language(), &supported),
        };

        engine.init(resources, &language, FALLBACK_LANGUAGE)?;
        tracing::debug!(language = %language, supported = ?supported, "i18n initialized");

        Ok(Self { engine, supported })
    }

    /// Translate `key`, returning the key itself when no table has it
    pub fn t(&self, key: &str) -> String {
        self.engine.translate(key).unwrap_or_else(|| key.to_string())
    }

    pub fn language(&self) -> &str {
        self.engine.language()
    }

    pub fn supported_languages(&self) -> Vec<String> {
        self.supported.clone()
    }

    pub fn is_supported(&self, language: &str) -> bool {
        self.supported.iter().any(|l| l == language)
    }

    /// Switch the active language
    pub fn change_language(&mut self, language: &str) -> Result<()> {
        if !self.is_supported(language) {
            return Err(Error::ConfigError(format!(
                "language '{}' is not in supported_languages",
                language
            )));
        }
        self.engine.change_language(language);
        tracing::info!(language, "language changed");
        Ok(())
    }

    /// Deep-merge more translations for `language`
    pub fn add_resources(&mut self, language: &str, table: Value) -> Result<()> {
        if !table.is_object() {
            return Err(Error::InvalidResources(language.to_string()));
        }
        self.engine.add_resource_bundle(language, table)
    }
}

/// Exact match first, then the primary subtag (`zh-CN` -> `zh`)
fn pick_language(detected: &str, supported: &[String]) -> String {
    if supported.iter().any(|l| l == detected) {
        return detected.to_string();
    }
    let primary = detected.split('-').next().unwrap_or(detected);
    supported
        .iter()
        .find(|l| l.as_str() == primary)
        .cloned()
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(language: &str) -> I18nConfig {
        I18nConfig {
            default_language: Some(language.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_base_tables() {
        let i18n = I18n::bootstrap(&config("en")).unwrap();
        assert_eq!(i18n.t("settings.title"), "Settings");
        assert_eq!(i18n.t("common.menu.logout"), "Log out");
        assert_eq!(i18n.supported_languages(), vec!["en", "zh"]);

        let i18n = I18n::bootstrap(&config("zh")).unwrap();
        assert_eq!(i18n.t("settings.title"), "设置");
    }

    #[test]
    fn test_missing_key_falls_back() {
        let resources = Resources::from([("zh".to_string(), json!({"only_en": null}))]);
        let mut i18n = I18n::bootstrap(&I18nConfig {
            default_language: Some("zh".into()),
            resources: Some(resources),
            ..Default::default()
        })
        .unwrap();
        i18n.add_resources("en", json!({"only_en": "English only"})).unwrap();

        assert_eq!(i18n.t("only_en"), "English only");
        assert_eq!(i18n.t("nav.nowhere"), "nav.nowhere");
    }

    #[test]
    fn test_app_resources_deep_merge() {
        let resources = Resources::from([
            ("en".to_string(), json!({"settings": {"title": "Preferences"}, "nav": {"home": "Home"}})),
            ("fr".to_string(), json!({"nav": {"home": "Accueil"}})),
        ]);
        let mut i18n = I18n::bootstrap(&I18nConfig {
            default_language: Some("en".into()),
            resources: Some(resources),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(i18n.t("settings.title"), "Preferences");
        assert_eq!(i18n.t("settings.description"), "Manage your application preferences.");
        assert_eq!(i18n.t("nav.home"), "Home");
        assert_eq!(i18n.supported_languages(), vec!["en", "fr", "zh"]);

        i18n.change_language("fr").unwrap();
        assert_eq!(i18n.language(), "fr");
        assert_eq!(i18n.t("nav.home"), "Accueil");
        // falls back to en
        assert_eq!(i18n.t("settings.description"), "Manage your application preferences.");
    }

    #[test]
    fn test_supported_languages_restrict_switching() {
        let mut i18n = I18n::bootstrap(&I18nConfig {
            default_language: Some("en".into()),
            supported_languages: Some(vec!["en".into()]),
            ..Default::default()
        })
        .unwrap();
        assert!(i18n.change_language("zh").is_err());
        assert_eq!(i18n.language(), "en");
    }

    #[test]
    fn test_deep_merge() {
        let mut target = json!({"a": {"b": 1, "c": 2}, "d": [1]});
        deep_merge(&mut target, json!({"a": {"c": 3}, "d": [2, 3], "e": "x"}));
        assert_eq!(target, json!({"a": {"b": 1, "c": 3}, "d": [2, 3], "e": "x"}));

        let mut target = json!({"a": "leaf"});
        deep_merge(&mut target, json!({"a": {"nested": true}}));
        assert_eq!(target, json!({"a": {"nested": true}}));
    }

    #[test]
    fn test_invalid_resources() {
        let result = merge_resources(Resources::new(), Resources::from([("en".to_string(), json!("nope"))]));
        assert!(matches!(result, Err(Error::InvalidResources(lang)) if lang == "en"));
    }

    #[test]
    fn test_pick_language() {
        let supported = vec!["en".to_string(), "zh".to_string()];
        assert_eq!(pick_language("zh-CN", &supported), "zh");
        assert_eq!(pick_language("en", &supported), "en");
        assert_eq!(pick_language("fr-FR", &supported), "en");
    }

    #[test]
    fn test_language_label() {
        assert_eq!(language_label("zh"), "中文");
        assert_eq!(language_label("pt"), "pt");
    }
}

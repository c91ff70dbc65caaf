use serde_json::Value;

use super::{Resources, deep_merge};
use crate::error::Result;

/// Translation backend
///
/// [`Catalog`] covers plain key lookup. A host with plural rules or
/// interpolation plugs its own engine in through [`super::I18n::with_engine`].
pub trait TranslationEngine: Send + Sync {
    fn init(&mut self, resources: Resources, language: &str, fallback: &str) -> Result<()>;

    /// Deep-merge `bundle` into the table for `language`, overwriting keys
    fn add_resource_bundle(&mut self, language: &str, bundle: Value) -> Result<()>;

    fn change_language(&mut self, language: &str);

    fn language(&self) -> &str;

    /// `None` when neither the active nor the fallback table has the key
    fn translate(&self, key: &str) -> Option<String>;
}

/// Nested JSON tables looked up by dotted keys
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: Resources,
    language: String,
    fallback: String,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, language: &str, key: &str) -> Option<String> {
        let mut node = self.resources.get(language)?;
        for part in key.split('.') {
            node = node.get(part)?;
        }
        node.as_str().map(str::to_string)
    }
}

impl TranslationEngine for Catalog {
    fn init(&mut self, resources: Resources, language: &str, fallback: &str) -> Result<()> {
        self.resources = resources;
        self.language = language.to_string();
        self.fallback = fallback.to_string();
        Ok(())
    }

    fn add_resource_bundle(&mut self, language: &str, bundle: Value) -> Result<()> {
        match self.resources.get_mut(language) {
            Some(existing) => deep_merge(existing, bundle),
            None => {
                self.resources.insert(language.to_string(), bundle);
            }
        }
        Ok(())
    }

    fn change_language(&mut self, language: &str) {
        self.language = language.to_string();
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn translate(&self, key: &str) -> Option<String> {
        self.lookup(&self.language, key)
            .or_else(|| self.lookup(&self.fallback, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dotted_lookup() {
        let mut catalog = Catalog::new();
        catalog
            .init(
                Resources::from([
                    ("en".to_string(), json!({"a": {"b": "deep", "n": 1}})),
                    ("de".to_string(), json!({"a": {"c": "tief"}})),
                ]),
                "de",
                "en",
            )
            .unwrap();

        assert_eq!(catalog.translate("a.c").as_deref(), Some("tief"));
        assert_eq!(catalog.translate("a.b").as_deref(), Some("deep"));
        // non-string leaves and whole objects are not translations
        assert_eq!(catalog.translate("a.n"), None);
        assert_eq!(catalog.translate("a"), None);
    }
}

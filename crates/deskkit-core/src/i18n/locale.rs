use std::env;

/// Detect the system language from environment variables.
///
/// Preference order: `LC_ALL`, then `LANG`. Falls back to `"en"` when unknown.
pub fn detect_system_language() -> String {
    let lc_all = env::var("LC_ALL").ok();
    let lang = env::var("LANG").ok();
    detect_from(lc_all.as_deref(), lang.as_deref())
}

fn detect_from(lc_all: Option<&str>, lang: Option<&str>) -> String {
    lc_all
        .and_then(normalize_locale)
        .or_else(|| lang.and_then(normalize_locale))
        .unwrap_or_else(|| "en".to_string())
}

/// `zh_CN.UTF-8` -> `zh-CN`; `C` and `POSIX` -> `en`
pub fn normalize_locale(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw.split('@').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("c") || raw.eq_ignore_ascii_case("posix") {
        return Some("en".to_string());
    }
    Some(raw.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_lc_all() {
        assert_eq!(detect_from(Some("zh_CN.UTF-8"), Some("en_US.UTF-8")), "zh-CN");
    }

    #[test]
    fn test_uses_lang_when_lc_all_missing() {
        assert_eq!(detect_from(None, Some("en_US.UTF-8")), "en-US");
        assert_eq!(detect_from(Some(""), Some("de_DE@euro")), "de-DE");
    }

    #[test]
    fn test_defaults_to_en() {
        assert_eq!(detect_from(None, None), "en");
        assert_eq!(normalize_locale("POSIX").as_deref(), Some("en"));
    }
}

//! Project name, display name and identifier rules

use regex::Regex;
use std::sync::LazyLock;

/// Name used with `--yes` when none is given
pub const DEFAULT_PROJECT_NAME: &str = "my-deskkit-app";

const MAX_NAME_LEN: usize = 64;

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("valid project name regex"));

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9]*(\.[a-z][a-z0-9]*)+$").expect("valid identifier regex")
});

/// Check a project name. The name becomes the directory and crate name.
pub fn validate_project_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Project name cannot be empty".to_string());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("Project name must be at most {} characters", MAX_NAME_LEN));
    }
    if !PROJECT_NAME.is_match(name) {
        return Err(
            "Project name must start with a lowercase letter and contain only lowercase letters, digits, '-' and '_'"
                .to_string(),
        );
    }
    if name.ends_with('-') || name.ends_with('_') {
        return Err("Project name cannot end with '-' or '_'".to_string());
    }
    Ok(())
}

/// Check a reverse-DNS app identifier such as `com.company.app`
pub fn validate_identifier(identifier: &str) -> Result<(), String> {
    if IDENTIFIER.is_match(identifier) {
        Ok(())
    } else {
        Err("Invalid identifier format (e.g., com.company.app)".to_string())
    }
}

/// `my-cool-app` -> `My Cool App`
pub fn default_display_name(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `my-cool-app` -> `com.deskkit.mycoolapp`
pub fn default_identifier(name: &str) -> String {
    format!("com.deskkit.{}", name.replace(['-', '_'], ""))
}

//! Template copying and placeholder substitution

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Files with these extensions get placeholder substitution
const TEXT_EXTENSIONS: &[&str] = &[
    "rs", "toml", "md", "json", "yaml", "yml", "css", "html", "conf", "txt",
];

/// Template files stored under a different name so the template directory
/// itself is not picked up by git or cargo
const RENAMES: &[(&str, &str)] = &[("_gitignore", ".gitignore"), ("_Cargo.toml", "Cargo.toml")];

/// Values substituted into a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVars {
    pub name: String,
    pub display_name: String,
    pub identifier: String,
}

impl ProjectVars {
    /// Replace `{{name}}`, `{{displayName}}` and `{{identifier}}`
    pub fn substitute(&self, contents: &str) -> String {
        contents
            .replace("{{name}}", &self.name)
            .replace("{{displayName}}", &self.display_name)
            .replace("{{identifier}}", &self.identifier)
    }
}

/// Where templates live: explicit flag, `DESKKIT_TEMPLATES_DIR`, the source
/// tree, then next to the executable
pub fn resolve_templates_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os("DESKKIT_TEMPLATES_DIR") {
        return PathBuf::from(dir);
    }
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
    if bundled.is_dir() {
        return bundled;
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
        .unwrap_or(bundled)
}

/// Names of the templates available under `templates_dir`
pub fn list_templates(templates_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(templates_dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext))
}

fn target_name(file_name: &str) -> &str {
    RENAMES
        .iter()
        .find(|(from, _)| *from == file_name)
        .map(|(_, to)| *to)
        .unwrap_or(file_name)
}

/// Copy `template` into `target`, substituting placeholders in text files
///
/// Returns the number of files written.
pub fn copy_template(template: &Path, target: &Path, vars: &ProjectVars) -> Result<usize> {
    if !template.is_dir() {
        bail!("Template directory {} does not exist", template.display());
    }
    fs::create_dir_all(target)
        .with_context(|| format!("failed to create {}", target.display()))?;

    let mut written = 0;
    for entry in fs::read_dir(template)
        .with_context(|| format!("failed to read {}", template.display()))?
    {
        let entry = entry?;
        let source = entry.path();
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let dest = target.join(target_name(&file_name));

        if entry.file_type()?.is_dir() {
            written += copy_template(&source, &dest, vars)?;
        } else if is_text_file(&source) || file_name.starts_with('_') {
            let contents = fs::read_to_string(&source)
                .with_context(|| format!("failed to read {}", source.display()))?;
            fs::write(&dest, vars.substitute(&contents))
                .with_context(|| format!("failed to write {}", dest.display()))?;
            written += 1;
        } else {
            fs::copy(&source, &dest)
                .with_context(|| format!("failed to copy {}", source.display()))?;
            written += 1;
        }
    }
    Ok(written)
}

/// Parse the generated `deskkit.toml`, if the template ships one
pub fn check_generated_config(project: &Path) -> Result<()> {
    let path = project.join("deskkit.toml");
    if !path.exists() {
        return Ok(());
    }
    deskkit_core::config::PartialConfig::from_path(&path)?;
    Ok(())
}

/// `git init` the new project
pub fn init_git(project: &Path) -> Result<()> {
    git2::Repository::init(project)
        .with_context(|| format!("failed to initialize git in {}", project.display()))?;
    Ok(())
}

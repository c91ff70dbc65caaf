//! CLI integration tests for create-deskkit-app
//!
//! Runs the scaffolder end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;

/// Counter for generating unique project names across tests
static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique, valid project name for testing
fn unique_project_name(base: &str) -> String {
    let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}-{}", base, count, std::process::id())
}

/// Helper to create a command isolated from the caller's environment
#[allow(deprecated)]
fn deskkit_cmd() -> Command {
    let mut cmd = Command::cargo_bin("create-deskkit-app").unwrap();
    cmd.env_remove("DESKKIT_TEMPLATES_DIR");
    cmd
}

#[test]
fn test_yes_creates_project() {
    let temp_dir = TempDir::new().unwrap();
    let project_name = unique_project_name("test-app");

    deskkit_cmd()
        .current_dir(&temp_dir)
        .args([&project_name, "-y", "-i", "com.example.testapp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project created successfully"))
        .stdout(predicate::str::contains(format!("cd {}", project_name)));

    let project_path = temp_dir.path().join(&project_name);
    assert!(project_path.join(".git").exists(), "Git directory should exist");
    assert!(project_path.join(".gitignore").exists(), "Gitignore should exist");
    assert!(!project_path.join("_gitignore").exists());
    assert!(project_path.join("src/main.rs").exists());

    let cargo = fs::read_to_string(project_path.join("Cargo.toml")).unwrap();
    assert!(cargo.contains(&format!("name = \"{}\"", project_name)));

    let config = fs::read_to_string(project_path.join("deskkit.toml")).unwrap();
    assert!(config.contains("com.example.testapp"));
    assert!(!config.contains("{{"), "placeholders should be substituted");
}

#[test]
fn test_yes_without_name_uses_default() {
    let temp_dir = TempDir::new().unwrap();

    deskkit_cmd()
        .current_dir(&temp_dir)
        .arg("--yes")
        .assert()
        .success();

    let config = fs::read_to_string(temp_dir.path().join("my-deskkit-app/deskkit.toml")).unwrap();
    assert!(config.contains("name = \"My Deskkit App\""));
    assert!(config.contains("com.deskkit.mydeskkitapp"));
}

#[test]
fn test_invalid_identifier_fails() {
    let temp_dir = TempDir::new().unwrap();

    deskkit_cmd()
        .current_dir(&temp_dir)
        .args(["valid-name", "-y", "-i", "not-an-identifier"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid identifier format"));

    assert!(!temp_dir.path().join("valid-name").exists());
}

#[test]
fn test_invalid_project_name_fails() {
    let temp_dir = TempDir::new().unwrap();

    deskkit_cmd()
        .current_dir(&temp_dir)
        .args(["Bad Name", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project name"));
}

#[test]
fn test_missing_template_fails() {
    let temp_dir = TempDir::new().unwrap();

    deskkit_cmd()
        .current_dir(&temp_dir)
        .args(["some-app", "-y", "--template", "does-not-exist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template \"does-not-exist\" not found"))
        .stderr(predicate::str::contains("default"));
}

#[test]
fn test_custom_templates_dir() {
    let temp_dir = TempDir::new().unwrap();
    let templates = temp_dir.path().join("templates");
    fs::create_dir_all(templates.join("tiny")).unwrap();
    fs::write(templates.join("tiny/NOTES.md"), "# {{displayName}}\n").unwrap();

    deskkit_cmd()
        .current_dir(&temp_dir)
        .args(["tiny-app", "-y", "-t", "tiny", "-d", "Tiny"])
        .arg("--templates-dir")
        .arg(&templates)
        .assert()
        .success();

    let notes = fs::read_to_string(temp_dir.path().join("tiny-app/NOTES.md")).unwrap();
    assert_eq!(notes, "# Tiny\n");
}

#[test]
fn test_existing_directory_replaced_with_yes() {
    let temp_dir = TempDir::new().unwrap();
    let project_path = temp_dir.path().join("existing-app");
    fs::create_dir_all(&project_path).unwrap();
    fs::write(project_path.join("stale.txt"), "old").unwrap();

    deskkit_cmd()
        .current_dir(&temp_dir)
        .args(["existing-app", "-y"])
        .assert()
        .success();

    assert!(!project_path.join("stale.txt").exists());
    assert!(project_path.join("Cargo.toml").exists());
}

#[test]
fn test_interactive_eof_cancels() {
    let temp_dir = TempDir::new().unwrap();

    deskkit_cmd()
        .current_dir(&temp_dir)
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Operation cancelled"));

    assert!(fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}

#[test]
fn test_interactive_declining_overwrite_keeps_directory() {
    let temp_dir = TempDir::new().unwrap();
    let project_path = temp_dir.path().join("kept-app");
    fs::create_dir_all(&project_path).unwrap();
    fs::write(project_path.join("keep.txt"), "mine").unwrap();

    deskkit_cmd()
        .current_dir(&temp_dir)
        .args(["kept-app", "-d", "Kept", "-i", "com.example.kept"])
        .write_stdin("n\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Operation cancelled"));

    assert!(project_path.join("keep.txt").exists());
}

#[test]
fn test_help() {
    deskkit_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--template"))
        .stdout(predicate::str::contains("--identifier"));
}

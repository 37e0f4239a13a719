//! CLI tests for the archost binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MANIFEST: &str = r#"
recipes:
  - name: Show Products
    description: List products
    particles: [ProductList]
  - name: Gift Wrap
    particles: [GiftWrapper]
"#;

/// Workspace with a manifest and a fast config; logs and user config stay inside it
fn workspace() -> TempDir {
    let dir = TempDir::new().expect("workspace");
    fs::write(dir.path().join("shop.yml"), MANIFEST).expect("manifest");
    fs::write(
        dir.path().join("archost.yml"),
        "host:\n  debounce-ms: 10\n  settle-ms: 10\nmanifest:\n  manifests: [shop.yml]\nwatcher:\n  enabled: false\n",
    )
    .expect("config");
    dir
}

fn archost(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("archost").expect("binary");
    cmd.current_dir(dir)
        .env("XDG_DATA_HOME", dir.join("data"))
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(dir.join("archost.yml"));
    cmd
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = archost(dir).args(args).arg("--format").arg("json").output().expect("run");
    assert!(
        output.status.success(),
        "archost failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

#[test]
fn test_plan_text_lists_recipes() {
    let dir = workspace();
    archost(dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Suggestions for demo-"))
        .stdout(predicate::str::contains("plan-show-products Show Products - List products"))
        .stdout(predicate::str::contains("plan-gift-wrap Gift Wrap"));
}

#[test]
fn test_plan_json_shape() {
    let dir = workspace();
    let out = run_json(dir.path(), &["plan"]);

    assert!(out["session-id"].as_str().is_some_and(|id| id.starts_with("demo-")));
    let plans = out["plans"].as_array().expect("plans array");
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["id"], "plan-show-products");
    assert_eq!(plans[0]["particles"][0], "ProductList");
}

#[test]
fn test_apply_json_replans_without_applied() {
    let dir = workspace();
    let out = run_json(dir.path(), &["apply", "gift"]);

    assert_eq!(out["applied"]["plan"]["name"], "Gift Wrap");
    assert_eq!(out["applied"]["settle-ms"], 10);
    let plans = out["plans"].as_array().expect("plans array");
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["name"], "Show Products");
}

#[test]
fn test_apply_unknown_plan_fails() {
    let dir = workspace();
    archost(dir.path())
        .args(["apply", "weather"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No plan matches 'weather'"));
}

#[test]
fn test_missing_manifest_gives_empty_plans() {
    let dir = workspace();
    fs::remove_file(dir.path().join("shop.yml")).unwrap();

    archost(dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no plans)"));
}

#[test]
fn test_bad_explicit_config_fails() {
    let dir = workspace();
    fs::write(dir.path().join("archost.yml"), "host: [broken").unwrap();

    archost(dir.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_log_file_written() {
    let dir = workspace();
    archost(dir.path()).arg("plan").arg("--verbose").assert().success();

    let log = fs::read_to_string(dir.path().join("data/archost/logs/archost.log")).expect("log file");
    assert!(log.contains("Logging initialized (verbose: true)"));
    assert!(log.contains("Publishing plans"));
}

//! Binary-level tests for the anypoint-connect CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn write_catalog(tmp: &TempDir) -> std::path::PathBuf {
    let path = tmp.path().join("catalog.json");
    let catalog = json!({
        "data": [
            {"scope": "profile"},
            {"scope": "read:organization", "context_params": {"org": ""}},
            {"scope": "manage:apis", "context_params": {"org": "", "envId": ""}}
        ]
    });
    std::fs::write(&path, catalog.to_string()).unwrap();
    path
}

fn cli(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("anypoint-connect").unwrap();
    cmd.env_clear()
        .arg("--config")
        .arg(tmp.path().join("missing.yaml"));
    cmd
}

#[test]
fn test_version_flag() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp).arg("--version").assert().success();
}

#[test]
fn test_scopes_command_prints_classification() {
    let tmp = TempDir::new().unwrap();
    let catalog = write_catalog(&tmp);

    cli(&tmp)
        .arg("scopes")
        .arg("--file")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("read:organization"))
        .stdout(predicate::str::contains("org+env"))
        .stdout(predicate::str::contains("3 scopes"));
}

#[test]
fn test_scopes_command_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp)
        .arg("scopes")
        .arg("--file")
        .arg(tmp.path().join("nope.json"))
        .assert()
        .failure();
}

#[test]
fn test_cleanup_declined_from_stdin() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp)
        .env("DELETE_APPS", "true")
        .env("ANYPOINT_URL", "http://127.0.0.1:9")
        .arg("cleanup")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(Y/n)"))
        .stdout(predicate::str::contains("Please type Proceed").not());
}

#[test]
fn test_invalid_toggle_value_is_reported() {
    let tmp = TempDir::new().unwrap();
    let catalog = write_catalog(&tmp);

    cli(&tmp)
        .env("CREATE", "sometimes")
        .env("DELETE_APPS", "maybe")
        .arg("scopes")
        .arg("--file")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid value for CREATE: sometimes"))
        .stdout(predicate::str::contains("Invalid value for DELETE_APPS: maybe"));
}

#[test]
fn test_empty_toggle_value_is_not_reported() {
    let tmp = TempDir::new().unwrap();
    let catalog = write_catalog(&tmp);

    cli(&tmp)
        .env("CREATE", "")
        .arg("scopes")
        .arg("--file")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid value").not());
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let tmp = TempDir::new().unwrap();
    cli(&tmp)
        .env("ANYPOINT_URL", "not a url")
        .arg("cleanup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base_url"));
}

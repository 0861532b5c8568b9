//! Integration tests for the isvc CLI
//!
//! These tests run the built binary and never reach a backend.

use std::io::Write;
use std::process::Command;

/// Get the path to the isvc binary
fn isvc_binary() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test executable name
    path.pop(); // Remove deps directory

    path.push("isvc");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    path
}

/// Run isvc with an empty home directory and no ISVC_* variables
fn run_isvc(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().unwrap();
    Command::new(isvc_binary())
        .args(args)
        .env("HOME", home.path())
        .env_remove("ISVC_ENDPOINT")
        .env_remove("ISVC_TOKEN")
        .env_remove("ISVC_ORG")
        .env_remove("ISVC_CLUSTER")
        .env_remove("ISVC_LOG")
        .output()
        .expect("Failed to execute isvc")
}

#[test]
fn test_isvc_version() {
    let output = run_isvc(&["--version"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("isvc"));
}

#[test]
fn test_isvc_help() {
    let output = run_isvc(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("activate"));
    assert!(stdout.contains("--organization"));
}

#[test]
fn test_isvc_list() {
    let output = run_isvc(&["list"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("monitoring"));
    assert!(stdout.contains("logging"));
}

#[test]
fn test_isvc_validate_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(b"logging:\n  metrics: true\n  tls: true\nloki:\n  enabled: false\n")
        .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let output = run_isvc(&["validate", "logging", "--file", &path]);

    assert!(output.status.success());
}

#[test]
fn test_isvc_validate_rejects_invalid_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{"prometheus": {"enabled": true, "storage": {"size": 0, "retention": "10d"}}}"#)
        .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let output = run_isvc(&["validate", "monitoring", "--file", &path]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid Monitoring specification"));
}

#[test]
fn test_isvc_activate_without_organization() {
    let output = run_isvc(&["activate", "monitoring", "--yes"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No organization configured"));
}

#[test]
fn test_isvc_unknown_service() {
    let output = run_isvc(&["get", "backup", "--organization", "acme", "--cluster", "prod"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown service: backup"));
}

#[test]
fn test_isvc_missing_config_file() {
    let output = run_isvc(&["list", "--config", "/nonexistent/isvc.yaml"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read config file"));
}

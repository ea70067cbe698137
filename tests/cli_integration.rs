mod common;

use assert_cmd::Command;
use common::{CannedResponse, CaptureServer};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Command isolated from the caller's environment and config file.
fn wecom_notify(temp_dir: &TempDir) -> Command {
    let config_path = temp_dir.path().join("config.toml");
    if !config_path.exists() {
        fs::write(&config_path, "").unwrap();
    }

    let mut cmd = Command::cargo_bin("wecom-notify").unwrap();
    cmd.env_remove("WECOM_NOTIFY_URL")
        .env_remove("WECOM_NOTIFY_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config_path);
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("wecom-notify").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Send WeCom notifications"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("wecom-notify").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wecom-notify"));
}

#[test]
fn test_text_prints_response() {
    let temp_dir = TempDir::new().unwrap();
    let server = CaptureServer::accepting(1);

    wecom_notify(&temp_dir)
        .args(["--base-url", server.url().as_str(), "--api-key", "cli-key"])
        .args(["text", "hello from cli", "--to-user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"));

    let request = server.next_request();
    assert_eq!(request.path, "/api/send/text");
    assert_eq!(request.header("x-api-key"), Some("cli-key"));
    assert_eq!(request.json(), json!({"text": "hello from cli", "touser": "alice"}));
}

#[test]
fn test_config_file_supplies_connection() {
    let temp_dir = TempDir::new().unwrap();
    let server = CaptureServer::start(vec![CannedResponse::json(
        200,
        json!({"status": "healthy"}),
    )]);
    fs::write(
        temp_dir.path().join("config.toml"),
        format!(
            "[server]\nbase_url = \"{}/\"\napi_key = \"file-key\"\n",
            server.url()
        ),
    )
    .unwrap();

    wecom_notify(&temp_dir)
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("healthy"));

    let request = server.next_request();
    assert_eq!(request.path, "/api/health");
    assert_eq!(request.header("x-api-key"), Some("file-key"));
}

#[test]
fn test_markdown_from_stdin() {
    let temp_dir = TempDir::new().unwrap();
    let server = CaptureServer::accepting(1);

    wecom_notify(&temp_dir)
        .args(["--base-url", server.url().as_str(), "--api-key", "k", "markdown", "-"])
        .write_stdin("# Title\n**bold**\n")
        .assert()
        .success();

    assert_eq!(
        server.next_request().json(),
        json!({"markdown": "# Title\n**bold**\n", "touser": "@all"})
    );
}

#[test]
fn test_dispatch_envelope() {
    let temp_dir = TempDir::new().unwrap();
    let server = CaptureServer::accepting(1);

    wecom_notify(&temp_dir)
        .args(["--base-url", server.url().as_str(), "--api-key", "k", "dispatch"])
        .write_stdin(r#"{"type": "text", "content": "from envelope", "touser": "a|b"}"#)
        .assert()
        .success();

    assert_eq!(
        server.next_request().json(),
        json!({"text": "from envelope", "touser": "a|b"})
    );
}

#[test]
fn test_missing_image_fails_without_request() {
    let temp_dir = TempDir::new().unwrap();
    let server = CaptureServer::accepting(1);

    wecom_notify(&temp_dir)
        .args(["--base-url", server.url().as_str(), "--api-key", "k"])
        .args(["image", "/no/such/picture.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));

    assert_eq!(server.pending_requests(), 0);
}

#[test]
fn test_missing_api_key() {
    let temp_dir = TempDir::new().unwrap();

    wecom_notify(&temp_dir)
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key is required"));
}

#[test]
fn test_missing_config_file() {
    let mut cmd = Command::cargo_bin("wecom-notify").unwrap();
    cmd.args(["--config", "/no/such/config.toml", "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_fail_on_error_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let server = CaptureServer::start(vec![
        CannedResponse::json(401, json!({"error": "Invalid API key"})),
        CannedResponse::json(401, json!({"error": "Invalid API key"})),
    ]);

    // Without the flag the response is printed and the run succeeds.
    wecom_notify(&temp_dir)
        .args(["--base-url", server.url().as_str(), "--api-key", "wrong", "text", "hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid API key"));

    wecom_notify(&temp_dir)
        .args(["--base-url", server.url().as_str(), "--api-key", "wrong", "--fail-on-error"])
        .args(["text", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Relay returned HTTP 401"));
}

#[test]
fn test_demo_runs_all_steps() {
    let temp_dir = TempDir::new().unwrap();
    let server = CaptureServer::start(vec![
        CannedResponse::json(200, json!({"status": "healthy"})),
        CannedResponse::json(200, json!({"success": true})),
        CannedResponse::json(200, json!({"success": true})),
    ]);

    wecom_notify(&temp_dir)
        .args(["--base-url", server.url().as_str(), "--api-key", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Health check..."))
        .stdout(predicate::str::contains("Sending markdown message..."))
        .stdout(predicate::str::contains("Demo finished!"));

    let paths: Vec<String> = (0..3).map(|_| server.next_request().path).collect();
    assert_eq!(paths, ["/api/health", "/api/send/text", "/api/send/markdown"]);
}

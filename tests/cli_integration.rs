//! CLI integration tests
//!
//! Runs the `xhs` binary against mock servers.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::helpers::start_sign_service;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command isolated from the caller's environment and config directory
fn xhs(config_home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("xhs");
    cmd.env_remove("XHS_COOKIE")
        .env_remove("XHS_SIGN_SERVER")
        .env_remove("XHS_PROXY")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path());
    cmd
}

fn hosts_config(base: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[hosts]\napi = \"{base}\"\ncreator = \"{base}\"\ncustomer = \"{base}\"\nhome = \"{base}\""
    )
    .unwrap();
    file
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    xhs(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    xhs(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("note"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("sign-server"))
        .stdout(predicate::str::contains("cookie"));
}

#[test]
fn test_missing_subcommand() {
    let home = TempDir::new().unwrap();
    xhs(&home).assert().failure();
}

#[test]
fn test_signed_command_without_sign_server() {
    let home = TempDir::new().unwrap();
    xhs(&home)
        .arg("me")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("sign server"));
}

#[test]
fn test_invalid_config_file() {
    let home = TempDir::new().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[client\ntimeout_ms = ").unwrap();

    xhs(&home)
        .args(["--config", file.path().to_str().unwrap(), "me"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn test_invalid_sign_server_flag() {
    let home = TempDir::new().unwrap();
    xhs(&home)
        .args(["--sign-server", "not a url", "me"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load configuration"))
        .stderr(predicate::str::contains("Invalid sign server"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_user_command_prints_json() {
    let api = MockServer::start().await;
    let sign = start_sign_service().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v1/user/otherinfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": {"nickname": "n"}})),
        )
        .expect(1)
        .mount(&api)
        .await;

    let home = TempDir::new().unwrap();
    let config = hosts_config(&api.uri());
    let sign_uri = sign.uri();
    let config_path = config.path().to_path_buf();

    let output = tokio::task::spawn_blocking(move || {
        xhs(&home)
            .args(["--config", config_path.to_str().unwrap()])
            .args(["--sign-server", &sign_uri, "--cookie", "a1=x"])
            .args(["user", "u1"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"nickname": "n"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_platform_failure_exits_nonzero() {
    let api = MockServer::start().await;
    let sign = start_sign_service().await;

    Mock::given(method("GET"))
        .and(path("/api/sns/web/v1/user/selfinfo"))
        .respond_with(ResponseTemplate::new(461).insert_header("verifyuuid", "u-9"))
        .mount(&api)
        .await;

    let home = TempDir::new().unwrap();
    let config = hosts_config(&api.uri());
    let sign_uri = sign.uri();
    let config_path = config.path().to_path_buf();

    let output = tokio::task::spawn_blocking(move || {
        xhs(&home)
            .args(["--config", config_path.to_str().unwrap()])
            .args(["--sign-server", &sign_uri, "me"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("u-9"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_html_note_needs_no_sign_server() {
    let api = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/explore/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<script>window.__INITIAL_STATE__={"note":{"noteDetailMap":{"n1":{"note":{"noteId":"n1"}}}}}</script>"#,
        ))
        .mount(&api)
        .await;

    let home = TempDir::new().unwrap();
    let config = hosts_config(&api.uri());
    let config_path = config.path().to_path_buf();

    let output = tokio::task::spawn_blocking(move || {
        xhs(&home)
            .args(["--config", config_path.to_str().unwrap()])
            .args(["note", "n1", "--html"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, json!({"note_id": "n1"}));
}

//! Integration tests for the `shopview` CLI binary.
//!
//! Argument parsing, help output, completions, and config handling run
//! offline. Product commands run against a wiremock catalogue.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `shopview` binary with env isolation.
///
/// Clears `SHOPVIEW_*` env vars and points the config file at `config`
/// so tests never touch the user's real configuration.
fn shopview_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("shopview");
    cmd.env("SHOPVIEW_CONFIG", config)
        .env("HOME", "/tmp/shopview-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/shopview-cli-test-nonexistent")
        .env_remove("SHOPVIEW_SOURCE")
        .env_remove("SHOPVIEW_ENDPOINT")
        .env_remove("SHOPVIEW_OUTPUT")
        .env_remove("SHOPVIEW_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Command isolated in a fresh temp dir; the dir must outlive the command.
fn isolated() -> (tempfile::TempDir, assert_cmd::Command) {
    let dir = tempfile::tempdir().unwrap();
    let cmd = shopview_cmd(&dir.path().join("config.toml"));
    (dir, cmd)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn catalogue_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Blue Shirt", "price": 19.99, "image": "https://img/1.png",
              "category": "clothing", "rating": { "rate": 4.1, "count": 12 } },
            { "id": 2, "title": "Red Hat", "price": 9.5, "image": "https://img/2.png" },
            { "id": 3, "title": "blue Jeans", "price": 49.0, "image": "https://img/3.png",
              "description": "Straight cut denim." }
        ])))
        .mount(&server)
        .await;
    server
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/products", server.uri())
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, mut cmd) = isolated();
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_dir, mut cmd) = isolated();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("product catalogues")
            .and(predicate::str::contains("products"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, mut cmd) = isolated();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shopview"));
}

#[test]
fn test_products_subcommands_exist() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["products", "--help"]).assert().success().stdout(
        predicate::str::contains("list").and(predicate::str::contains("get")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let (_dir, mut cmd) = isolated();
    let output = cmd.arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["products", "list", "-o", "xml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_unknown_source() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["products", "list", "--source", "nowhere"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_invalid_endpoint_is_usage_error() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["products", "list", "--endpoint", "not a url"])
        .assert()
        .failure()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    shopview_cmd(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_show_without_file_uses_defaults() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_source = \"default\""));
}

#[test]
fn test_config_init_then_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    shopview_cmd(&config).args(["config", "init"]).assert().success();
    let text = std::fs::read_to_string(&config).unwrap();
    assert!(text.contains("fakestoreapi.com"));

    shopview_cmd(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    shopview_cmd(&config)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_set_and_use_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    shopview_cmd(&config)
        .args(["config", "set", "sources.local.endpoint", "http://127.0.0.1:3000/products"])
        .assert()
        .success();
    shopview_cmd(&config)
        .args(["config", "use", "local"])
        .assert()
        .success();
    shopview_cmd(&config)
        .args(["config", "sources"])
        .assert()
        .success()
        .stdout(predicate::str::contains("local *"));
}

#[test]
fn test_config_use_unknown_source_fails() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["config", "use", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

// ── Products (wiremock) ─────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_products_list_search_json() {
    let server = catalogue_server().await;
    let (_dir, mut cmd) = isolated();

    let output = cmd
        .args(["products", "list", "--search", "BLUE", "-o", "json", "-e"])
        .arg(endpoint(&server))
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let list: Value = serde_json::from_slice(&output.stdout).unwrap();
    let titles: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(titles, ["Blue Shirt", "blue Jeans"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_products_list_plain_keeps_order() {
    let server = catalogue_server().await;
    let (_dir, mut cmd) = isolated();

    cmd.args(["products", "list", "-o", "plain", "-e"])
        .arg(endpoint(&server))
        .assert()
        .success()
        .stdout("1\n2\n3\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_products_list_no_results() {
    let server = catalogue_server().await;
    let (_dir, mut cmd) = isolated();

    cmd.args(["products", "list", "--search", "xyz", "-e"])
        .arg(endpoint(&server))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No products found."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_products_get() {
    let server = catalogue_server().await;
    let (_dir, mut cmd) = isolated();

    cmd.args(["products", "get", "3", "--color", "never", "-e"])
        .arg(endpoint(&server))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("blue Jeans")
                .and(predicate::str::contains("$49.00"))
                .and(predicate::str::contains("Straight cut denim.")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_products_get_missing_is_not_found() {
    let server = catalogue_server().await;
    let (_dir, mut cmd) = isolated();

    cmd.args(["products", "get", "99", "-e"])
        .arg(endpoint(&server))
        .assert()
        .failure()
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_exits_with_load_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, mut cmd) = isolated();

    cmd.args(["products", "list", "-e"])
        .arg(endpoint(&server))
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("Failed to load products."));
}

#[test]
fn test_connection_refused_exits_with_load_failure() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["products", "list", "--timeout", "5", "-e", "http://127.0.0.1:9/products"])
        .assert()
        .failure()
        .code(7);
}

//! Integration tests for the `brilliant` CLI binary.
//!
//! Parsing, help and completions run without a backend. License and
//! catalog flows run against a wiremock command bridge.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `brilliant` binary with env isolation.
///
/// Clears `BRILLIANT_*` variables and points config and cache directories
/// at a nonexistent path so tests never touch real state.
fn brilliant_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("brilliant");
    cmd.env("HOME", "/tmp/brilliant-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/brilliant-cli-test-nonexistent/config")
        .env("XDG_CACHE_HOME", "/tmp/brilliant-cli-test-nonexistent/cache")
        .env_remove("BRILLIANT_BACKEND_URL")
        .env_remove("BRILLIANT_BACKEND_TIMEOUT")
        .env_remove("BRILLIANT_BACKEND_INSECURE")
        .env_remove("BRILLIANT_CACHE_DIR")
        .env_remove("BRILLIANT_CACHE_PERSIST")
        .env_remove("BRILLIANT_CACHE_TTL")
        .env_remove("RUST_LOG");
    cmd
}

/// `brilliant_cmd` aimed at `server` with its own cache directory.
fn backed_cmd(server: &MockServer, cache: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = brilliant_cmd();
    cmd.args(["--backend", &server.uri(), "--cache-dir"])
        .arg(cache.path())
        .args(["--color", "never"]);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "data": data }))
}

async fn reply(server: &MockServer, command: &str, data: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/invoke/{command}")))
        .respond_with(ok(data))
        .mount(server)
        .await;
}

async fn licensed_backend() -> MockServer {
    let server = MockServer::start().await;
    reply(&server, "is_license_activated", json!(true)).await;
    reply(
        &server,
        "validate_current_license",
        json!({
            "is_valid": true,
            "status": "valid",
            "message": "License valid",
            "days_remaining": null
        }),
    )
    .await;
    reply(
        &server,
        "get_license_info",
        json!({
            "key": "ABCD-EFGH-IJKL-MNOP",
            "machine_code": "MC-42",
            "expires": "2027-01-01",
            "product_id": "brilliant",
            "premium": true,
            "max_offline_days": 7,
            "days_until_expiry": 180
        }),
    )
    .await;
    server
}

async fn unlicensed_backend() -> MockServer {
    let server = MockServer::start().await;
    reply(&server, "is_license_activated", json!(false)).await;
    server
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = brilliant_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    brilliant_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("jewelry catalog")
            .and(predicate::str::contains("license"))
            .and(predicate::str::contains("sections")),
    );
}

#[test]
fn test_version_flag() {
    brilliant_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("brilliant"));
}

#[test]
fn test_completions_zsh() {
    brilliant_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_config_path() {
    brilliant_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_items_update_rejects_malformed_attribute_edit() {
    let output = brilliant_cmd()
        .args(["items", "update", "it-1", "--set-info", "Ouro=18k"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("ID:NAME=VALUE"));
}

#[test]
fn test_items_create_requires_an_info() {
    let output = brilliant_cmd()
        .args(["items", "create", "--code", "R1", "-s", "rings", "--image", "x.jpg"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── License ─────────────────────────────────────────────────────────

#[test]
fn test_blank_license_key_is_a_usage_error() {
    let cache = tempfile::tempdir().unwrap();
    let output = brilliant_cmd()
        .args(["--backend", "http://127.0.0.1:9", "--cache-dir"])
        .arg(cache.path())
        .args(["license", "activate", "   "])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("license key"));
}

#[test]
fn test_deactivate_needs_yes_without_a_terminal() {
    let cache = tempfile::tempdir().unwrap();
    let output = brilliant_cmd()
        .args(["--backend", "http://127.0.0.1:9", "--cache-dir"])
        .arg(cache.path())
        .args(["license", "deactivate"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_status_without_activation() {
    let server = unlicensed_backend().await;
    let cache = tempfile::tempdir().unwrap();

    let output = backed_cmd(&server, &cache)
        .args(["license", "status", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let report = stdout_json(&output);
    assert_eq!(report["view"]["view"], "activation_required");
    assert_eq!(report["can_use_app"], false);
    assert_eq!(report["source"], "verified");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_status_is_cached_across_runs() {
    let server = licensed_backend().await;
    let cache = tempfile::tempdir().unwrap();

    let first = backed_cmd(&server, &cache)
        .args(["license", "status", "-o", "json"])
        .output()
        .unwrap();
    assert!(first.status.success(), "{}", combined_output(&first));
    let report = stdout_json(&first);
    assert_eq!(report["view"]["view"], "open");
    assert_eq!(report["source"], "verified");
    assert_eq!(report["license_info"]["key"], "ABCD-****-****-MNOP");
    assert!(cache.path().join("license_verification_cache.json").exists());

    let second = backed_cmd(&server, &cache)
        .args(["license", "status", "-o", "json"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&second)["source"], "cached");

    let checks = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/invoke/is_license_activated")
        .count();
    assert_eq!(checks, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cache_clear_removes_the_record() {
    let server = licensed_backend().await;
    let cache = tempfile::tempdir().unwrap();
    let record = cache.path().join("license_verification_cache.json");

    backed_cmd(&server, &cache)
        .args(["license", "status"])
        .assert()
        .success();
    assert!(record.exists());

    backed_cmd(&server, &cache)
        .args(["cache", "clear"])
        .assert()
        .success();
    assert!(!record.exists());
}

// ── Catalog ─────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_catalog_is_locked_without_license() {
    let server = unlicensed_backend().await;
    let cache = tempfile::tempdir().unwrap();

    let output = backed_cmd(&server, &cache)
        .args(["sections", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("license activate"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sections_list_when_licensed() {
    let server = licensed_backend().await;
    reply(
        &server,
        "list_sections",
        json!([{ "id": "s1", "name": "rings" }, { "id": "s2", "name": "necklaces" }]),
    )
    .await;
    let cache = tempfile::tempdir().unwrap();

    backed_cmd(&server, &cache)
        .args(["sections", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::eq("s1\ns2\n"));
}

#[test]
fn test_unreachable_backend_exits_with_connection_code() {
    let cache = tempfile::tempdir().unwrap();
    let output = brilliant_cmd()
        .args(["--backend", "http://127.0.0.1:9", "--cache-dir"])
        .arg(cache.path())
        .args(["license", "machine-code"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_catalog_summary() {
    let server = licensed_backend().await;
    reply(&server, "has_sections", json!(true)).await;
    reply(&server, "has_items", json!(false)).await;
    let cache = tempfile::tempdir().unwrap();

    let output = backed_cmd(&server, &cache)
        .args(["catalog", "summary", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        stdout_json(&output),
        json!({ "has_sections": true, "has_items": false })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_items_update_keeps_unchanged_fields() {
    let server = licensed_backend().await;
    reply(
        &server,
        "get_item",
        json!({
            "id": "it-1",
            "code": "AN-001",
            "description": "Anel",
            "section_id": "s1",
            "image_path": "./images/AN-001.jpg"
        }),
    )
    .await;
    reply(&server, "get_section", json!({ "id": "s1", "name": "rings" })).await;
    reply(&server, "get_section_by_name", json!({ "id": "s1", "name": "rings" })).await;
    reply(&server, "update_info", json!(null)).await;
    reply(&server, "delete_info", json!(null)).await;
    Mock::given(method("POST"))
        .and(path("/invoke/update_item"))
        .and(body_json(json!({
            "id": "it-1",
            "code": "AN-001",
            "description": "Anel solitário",
            "sectionId": "s1",
            "imagePath": "./images/AN-001.jpg"
        })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    let cache = tempfile::tempdir().unwrap();

    let output = backed_cmd(&server, &cache)
        .args([
            "items",
            "update",
            "it-1",
            "-d",
            "Anel solitário",
            "--set-info",
            "info-1:Ouro=24k",
            "--remove-info",
            "info-2",
            "-o",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let saved = stdout_json(&output);
    assert_eq!(saved["infos"][0]["id"], "info-1");
    assert_eq!(saved["infos"][0]["item_code"], "AN-001");
    assert_eq!(saved["removed"], json!(["info-2"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_infos_delete_with_yes() {
    let server = licensed_backend().await;
    Mock::given(method("POST"))
        .and(path("/invoke/delete_info"))
        .and(body_json(json!({ "id": "info-2" })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    let cache = tempfile::tempdir().unwrap();

    backed_cmd(&server, &cache)
        .args(["--yes", "infos", "delete", "info-2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Attribute deleted"));
}

// ── Settings ────────────────────────────────────────────────────────

fn profile() -> Value {
    json!({
        "id": 1,
        "name": "Joalheria Aurora",
        "save_path": "",
        "instagram_username": "",
        "website_url": "",
        "youtube_channel": "",
        "image_path": "",
        "image_blob": [1, 2, 3],
        "pallet": "gold",
        "phone_number": "",
        "email": "",
        "created_at": "2026-01-01 10:00:00",
        "updated_at": "2026-01-01 10:00:00"
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_settings_are_locked_without_license() {
    let server = unlicensed_backend().await;
    let cache = tempfile::tempdir().unwrap();

    let output = backed_cmd(&server, &cache)
        .args(["settings", "show"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_settings_show_summarizes_the_image() {
    let server = licensed_backend().await;
    reply(&server, "get_settings", profile()).await;
    let cache = tempfile::tempdir().unwrap();

    let output = backed_cmd(&server, &cache)
        .args(["settings", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let view = stdout_json(&output);
    assert_eq!(view["name"], "Joalheria Aurora");
    assert_eq!(view["palette"], "gold");
    assert_eq!(view["image_bytes"], 3);
    assert!(view.get("image_blob").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_settings_set_saves_trimmed_fields() {
    let server = licensed_backend().await;
    reply(&server, "get_settings", profile()).await;
    let mut expected = profile();
    expected["instagram_username"] = json!("aurora.joias");
    Mock::given(method("POST"))
        .and(path("/invoke/save_settings_command"))
        .and(body_json(json!({ "settings": expected })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    let cache = tempfile::tempdir().unwrap();

    backed_cmd(&server, &cache)
        .args(["settings", "set", "--instagram", "  aurora.joias "])
        .assert()
        .success()
        .stderr(predicate::str::contains("Settings saved"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_settings_set_rejects_bad_email() {
    let server = licensed_backend().await;
    let cache = tempfile::tempdir().unwrap();

    let output = backed_cmd(&server, &cache)
        .args(["settings", "set", "--email", "aurora"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("email"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_settings_image_set_and_get() {
    let server = licensed_backend().await;
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    Mock::given(method("POST"))
        .and(path("/invoke/save_user_image"))
        .and(body_json(json!({ "imageData": png })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    reply(&server, "get_user_image", json!(png)).await;
    let cache = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("logo.png");
    std::fs::write(&source, png).unwrap();

    backed_cmd(&server, &cache)
        .args(["settings", "image", "set"])
        .arg(&source)
        .assert()
        .success();

    let target = dir.path().join("out.png");
    backed_cmd(&server, &cache)
        .args(["settings", "image", "get"])
        .arg(&target)
        .assert()
        .success();
    assert_eq!(std::fs::read(&target).unwrap(), png);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_profile_image_is_not_found() {
    let server = licensed_backend().await;
    reply(&server, "get_user_image", json!([])).await;
    let cache = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let output = backed_cmd(&server, &cache)
        .args(["settings", "image", "get"])
        .arg(dir.path().join("out.png"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_update_check_prints_the_version() {
    let server = licensed_backend().await;
    reply(&server, "check_for_update", json!("1.4.0")).await;
    let cache = tempfile::tempdir().unwrap();

    backed_cmd(&server, &cache)
        .args(["update", "check"])
        .assert()
        .success()
        .stdout(predicate::eq("1.4.0\n"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_update_install_when_up_to_date_installs_nothing() {
    let server = licensed_backend().await;
    reply(&server, "check_for_update", json!(null)).await;
    Mock::given(method("POST"))
        .and(path("/invoke/download_and_install_update"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;
    let cache = tempfile::tempdir().unwrap();

    backed_cmd(&server, &cache)
        .args(["--yes", "update", "install"])
        .assert()
        .success()
        .stderr(predicate::str::contains("up to date"));
}

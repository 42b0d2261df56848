//! Command behavior against a scratch public directory and an in-process
//! mock server.

use pretty_assertions::assert_eq;
use preview_cli::commands::{self, RequestArgs};
use preview_cli::PreviewConfig;
use preview_client::ClientConfig;
use preview_mock::{Method, MockMode, OperationKey};
use preview_spec::Role;
use preview_test_utils::{fixtures, sample_spec, write_public_dir};
use serde_json::json;
use std::time::Duration;

fn scratch() -> (tempfile::TempDir, PreviewConfig) {
    let dir = tempfile::tempdir().unwrap();
    write_public_dir(dir.path()).unwrap();
    let config = PreviewConfig::new().with_public_dir(dir.path());
    (dir, config)
}

fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn validate_public_path_and_file_path() {
    let (dir, config) = scratch();

    let mut out = Vec::new();
    let spec = commands::validate(&config, fixtures::USER_LIST_YAML_PATH, &mut out)
        .await
        .unwrap();
    assert_eq!(spec, sample_spec());
    assert_eq!(
        text(out),
        "valid: user-list \"Users\" (3 columns, 3 fields, 4 actions)\n"
    );

    let on_disk = dir.path().join("spec").join("user-list.screen.json");
    let mut out = Vec::new();
    let spec = commands::validate(&config, on_disk.to_str().unwrap(), &mut out)
        .await
        .unwrap();
    assert_eq!(spec.id, "user-list");
}

#[tokio::test]
async fn validate_reports_the_failing_field() {
    let (dir, config) = scratch();
    std::fs::write(
        dir.path().join("spec").join("broken.screen.json"),
        r#"{"id": "x", "title": "X"}"#,
    )
    .unwrap();

    let err = commands::validate(&config, "/spec/broken.screen.json", &mut Vec::new())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("type"), "{err:#}");
}

#[tokio::test]
async fn request_lists_seeded_users() {
    let (_dir, config) = scratch();
    let mut out = Vec::new();
    let body = commands::request(
        &config,
        &RequestArgs::new(Method::Get, "/api/users"),
        &mut out,
    )
    .await
    .unwrap();
    assert_eq!(body["users"].as_array().map(Vec::len), Some(2));
    assert!(text(out).contains("Alice Johnson"));
}

#[tokio::test]
async fn guest_create_surfaces_server_message() {
    let (_dir, config) = scratch();
    let mut args = RequestArgs::new(Method::Post, "/api/users");
    args.body = Some(json!({ "name": "Carol" }));
    args.role = Some(Role::Guest);
    args.show_log = true;

    let mut out = Vec::new();
    let err = commands::request(&config, &args, &mut out).await.unwrap_err();
    assert!(format!("{err:#}").contains("Guests cannot create users"));

    let log = text(out);
    assert!(log.contains("POST /api/users request"));
    assert!(log.contains("POST /api/users error"));
}

#[tokio::test]
async fn timeout_mode_hits_client_ceiling() {
    let (_dir, config) = scratch();
    let config = config.with_client(ClientConfig::new().with_timeout(Duration::from_millis(50)));
    let mut args = RequestArgs::new(Method::Get, "/api/users");
    args.modes = vec![(OperationKey::GET_USERS, MockMode::Timeout)];

    let err = commands::request(&config, &args, &mut Vec::new())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("GET /api/users"));
}

#[tokio::test]
async fn preview_renders_table_and_gates() {
    let (_dir, config) = scratch();

    let mut out = Vec::new();
    commands::preview(&config, fixtures::USER_LIST_JSON_PATH, Role::Admin, None, &mut out)
        .await
        .unwrap();
    let rendered = text(out);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "Users (admin)");
    assert_eq!(lines[1], "New user: enabled | Delete: enabled");
    assert!(lines[2].starts_with("Name"));
    assert!(rendered.contains("Alice Johnson"));

    let mut out = Vec::new();
    commands::preview(&config, fixtures::USER_LIST_JSON_PATH, Role::Guest, Some("bob"), &mut out)
        .await
        .unwrap();
    let rendered = text(out);
    assert!(rendered.contains("New user: disabled | Delete: disabled"));
    assert!(rendered.contains("Bob Smith"));
    assert!(!rendered.contains("Alice Johnson"));
}

#[test]
fn config_file_feeds_every_layer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preview.toml");
    std::fs::write(
        &path,
        "public_dir = \"site\"\n[client]\ntimeout_ms = 900\n",
    )
    .unwrap();

    let config = PreviewConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.public_dir, std::path::PathBuf::from("site"));
    assert_eq!(config.client.timeout(), Duration::from_millis(900));
    assert_eq!(config.mock.delay_ms, 1800);
}

//! End-to-end: load a spec from disk and drive its screen against the
//! in-process mock server.

use preview_client::{ApiClient, ClientConfig, InProcessTransport};
use preview_mock::{MockMode, MockServer, OperationKey};
use preview_renderer::prelude::*;
use preview_renderer::SessionError;
use preview_test_utils::{fixtures, sample_spec, seeded_server, write_public_dir};
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn client_for(server: &Arc<MockServer>) -> ApiClient {
    ApiClient::new(
        Arc::new(InProcessTransport::new(Arc::clone(server))),
        ClientConfig::new(),
    )
}

fn form(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), json!(v)))
        .collect()
}

async fn load_fixture(path: &str) -> ScreenSpec {
    let dir = tempfile::tempdir().unwrap();
    write_public_dir(dir.path()).unwrap();
    SpecLoader::new(FsSource::new(dir.path()))
        .load(path)
        .await
        .unwrap()
}

#[tokio::test]
async fn bundled_documents_validate_to_sample_spec() {
    assert_eq!(load_fixture(fixtures::USER_LIST_JSON_PATH).await, sample_spec());
    assert_eq!(load_fixture(fixtures::USER_LIST_YAML_PATH).await, sample_spec());
}

#[tokio::test]
async fn admin_lists_creates_and_deletes() {
    let spec = load_fixture(fixtures::USER_LIST_JSON_PATH).await;
    let server = seeded_server();
    let mut session = ScreenSession::open(ScreenModel::new(spec), client_for(&server), Role::Admin);

    assert_eq!(session.refresh().await.unwrap().len(), 2);

    let created = session
        .create(form(&[("name", "Carol"), ("email", "carol@example.com")]))
        .await
        .unwrap();
    assert_eq!(created["role"], "user");
    assert_eq!(session.rows().len(), 3);
    assert_eq!(session.rows()[0]["name"], "Carol");

    session.delete("u-1").await.unwrap();
    let ids: Vec<&str> = session
        .rows()
        .iter()
        .filter_map(|r| r["id"].as_str())
        .collect();
    assert!(!ids.contains(&"u-1"));
    assert_eq!(ids.len(), 2);

    let messages = session.log().messages();
    assert_eq!(messages.last().map(String::as_str), Some("open screen user-list"));
    assert!(messages.iter().any(|m| m == "delete clicked for u-1"));
    assert!(messages.iter().any(|m| m == "create submit"));
}

#[tokio::test]
async fn search_filters_visible_rows() {
    let server = seeded_server();
    let mut session =
        ScreenSession::open(ScreenModel::new(sample_spec()), client_for(&server), Role::Admin);
    session.refresh().await.unwrap();

    session.set_query("bob");
    let visible = session.visible_rows();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0]["id"], "u-2");

    session.set_query("");
    assert_eq!(session.visible_rows().len(), 2);
}

#[tokio::test]
async fn local_gate_blocks_before_any_request() {
    let server = seeded_server();
    let mut session =
        ScreenSession::open(ScreenModel::new(sample_spec()), client_for(&server), Role::User);

    let err = session.delete("u-1").await.unwrap_err();
    assert!(matches!(err, SessionError::NotPermitted { role: Role::User, .. }));
    assert_eq!(server.users().users().len(), 2);
    assert!(!session
        .log()
        .messages()
        .iter()
        .any(|m| m.starts_with("DELETE")));
}

#[tokio::test]
async fn missing_required_field_is_rejected_locally() {
    let server = seeded_server();
    let mut session =
        ScreenSession::open(ScreenModel::new(sample_spec()), client_for(&server), Role::Admin);
    let err = session.create(form(&[("name", "Carol")])).await.unwrap_err();
    assert!(matches!(err, SessionError::Form(_)));
    assert_eq!(server.users().users().len(), 2);
}

#[tokio::test]
async fn server_side_denial_surfaces_message() {
    // The screen thinks a guest may delete, the server disagrees.
    let mut spec = sample_spec();
    spec.actions.retain(|a| a.label != "Delete");
    let server = seeded_server();
    server.scenarios().set_role(Role::Guest);
    let mut session = ScreenSession::open(ScreenModel::new(spec), client_for(&server), Role::Guest);

    let err = session.delete("u-1").await.unwrap_err();
    assert_eq!(err.to_string(), "Only admins can delete");
}

#[tokio::test]
async fn failed_refresh_keeps_previous_rows() {
    let server = seeded_server();
    let mut session =
        ScreenSession::open(ScreenModel::new(sample_spec()), client_for(&server), Role::Admin);
    session.refresh().await.unwrap();

    server
        .scenarios()
        .set_mode(OperationKey::GET_USERS, MockMode::ServerError);
    let err = session.refresh().await.unwrap_err();
    assert_eq!(err.to_string(), "Server Error (500)");
    assert_eq!(session.rows().len(), 2);
}

#[tokio::test]
async fn mutation_succeeds_even_when_reload_fails() {
    let server = seeded_server();
    let mut session =
        ScreenSession::open(ScreenModel::new(sample_spec()), client_for(&server), Role::Admin);
    session.refresh().await.unwrap();
    server
        .scenarios()
        .set_mode(OperationKey::GET_USERS, MockMode::ServerError);

    let created = session
        .create(form(&[("name", "Carol"), ("email", "carol@example.com")]))
        .await
        .unwrap();
    assert_eq!(created["name"], "Carol");
    assert_eq!(server.users().users().len(), 3);
    // previous listing is kept
    assert_eq!(session.rows().len(), 2);

    session.delete("u-2").await.unwrap();
    assert_eq!(server.users().users().len(), 2);

    let messages = session.log().messages();
    assert_eq!(
        messages[0],
        "reload after delete failed: Server Error (500)"
    );
    assert!(messages
        .iter()
        .any(|m| m == "reload after create failed: Server Error (500)"));
}

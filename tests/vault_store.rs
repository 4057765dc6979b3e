//! Vault KV v2 store tests against a mocked Vault HTTP API.

mod common;

use common::SCENARIO;
use kolla_vault::document::Document;
use kolla_vault::flows::{materialize, verify};
use kolla_vault::secrets::{SecretPayload, SecretStore, SecretString, StoreError, VaultSecretStore};
use kolla_vault::transform::{derive, SecretPath};
use kolla_vault::{Error, MigrationConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "hvs.test-token";

fn store_for(server: &MockServer) -> VaultSecretStore {
    VaultSecretStore::new(&server.uri(), &SecretString::new(TOKEN)).unwrap()
}

fn secret_path(keys: &[&str], leaf: &str) -> SecretPath {
    derive("secret/data/kolla", "default", keys, leaf)
}

fn vault_envelope(data: serde_json::Value) -> serde_json::Value {
    json!({
        "request_id": "5c1a6d0e-6a4b-4c1f-9a3e-7a3f1f2d9b10",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": data,
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

fn version_metadata(version: u64) -> serde_json::Value {
    json!({
        "created_time": "2026-10-19T09:12:44.123456789Z",
        "custom_metadata": null,
        "deletion_time": "",
        "destroyed": false,
        "version": version
    })
}

fn write_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(vault_envelope(version_metadata(1)))
}

fn read_ok(value: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(vault_envelope(json!({
        "data": { "value": value },
        "metadata": version_metadata(1)
    })))
}

#[tokio::test]
async fn test_write_secret_posts_value_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/kolla/default/db_password"))
        .and(header("X-Vault-Token", TOKEN))
        .and(body_partial_json(json!({ "data": { "value": "s3cr3t" } })))
        .respond_with(write_ok())
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store
        .write_secret(&secret_path(&[], "db_password"), &SecretPayload::new("s3cr3t"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_write_secret_rejected_names_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/kolla/default/db_password"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "errors": ["permission denied"] })),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store
        .write_secret(&secret_path(&[], "db_password"), &SecretPayload::new("s3cr3t"))
        .await
        .unwrap_err();

    match err {
        StoreError::WriteRejected { path, .. } => {
            assert_eq!(path, "secret/data/kolla/default/db_password")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_read_secret_returns_stored_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/kolla/default/rabbit/password"))
        .and(header("X-Vault-Token", TOKEN))
        .respond_with(read_ok("guest"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let payload = store.read_secret(&secret_path(&["rabbit"], "password")).await.unwrap();

    assert_eq!(payload.map(|p| p.value), Some("guest".to_string()));
}

#[tokio::test]
async fn test_read_secret_missing_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/kolla/default/absent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "errors": [] })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert!(store.read_secret(&secret_path(&[], "absent")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_kv1_style_path_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(write_ok()).expect(0).mount(&server).await;

    let store = store_for(&server);
    let path = derive::<&str>("secret/kolla", "default", &[], "db_password");
    let err = store.write_secret(&path, &SecretPayload::new("x")).await.unwrap_err();

    assert!(matches!(err, StoreError::InvalidPath { .. }));
}

#[tokio::test]
async fn test_materialize_scenario_against_vault() {
    let server = MockServer::start().await;
    for (route, value) in [
        ("/v1/secret/data/kolla/default/db_password", ""),
        ("/v1/secret/data/kolla/default/rabbit/password", ""),
    ] {
        Mock::given(method("POST"))
            .and(path(route))
            .and(body_partial_json(json!({ "data": { "value": value } })))
            .respond_with(write_ok())
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/kolla/default/rabbit/user"))
        .respond_with(write_ok())
        .expect(0)
        .mount(&server)
        .await;

    let config = MigrationConfig { vault_address: server.uri(), ..MigrationConfig::default() };
    let store = store_for(&server);
    let document = Document::from_yaml_str(SCENARIO).unwrap();

    let summary = materialize(&document, &config, &store).await.unwrap();
    assert_eq!(summary.written, 2);
}

#[tokio::test]
async fn test_materialize_aborts_on_vault_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/kolla/default/a"))
        .respond_with(write_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/kolla/default/b"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "errors": ["internal error"] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/kolla/default/c"))
        .respond_with(write_ok())
        .expect(0)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let document = Document::from_yaml_str("a: '1'\nb: '2'\nc: '3'\n").unwrap();

    let err = materialize(&document, &MigrationConfig::default(), &store).await.unwrap_err();
    assert!(matches!(err, Error::WriteAborted { ref path, written: 1, .. } if path == "secret/data/kolla/default/b"));
}

#[tokio::test]
async fn test_verify_against_vault() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/kolla/default/db_password"))
        .respond_with(read_ok(""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/kolla/default/rabbit/password"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "errors": [] })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let document = Document::from_yaml_str(SCENARIO).unwrap();

    let report = verify(&document, &MigrationConfig::default(), &store).await.unwrap();

    assert_eq!(report.matched, 1);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].as_str(), "secret/data/kolla/default/rabbit/password");
}

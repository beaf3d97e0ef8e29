//! Integration tests for the instance lifecycle: idempotent creation,
//! state mapping, and teardown.

use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use skybridge_core::domain::errors::AdapterError;
use skybridge_core::ports::messaging_gateway::SessionState;
use skybridge_evolution::session;

use crate::common::{
    instance, mount_connection_state, mount_fetch_instances, setup_gateway_mock,
};

#[tokio::test]
async fn test_create_sends_instance_payload() {
    let (server, client) = setup_gateway_mock().await;
    mount_fetch_instances(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path("/instance/create"))
        .and(header("apikey", "test-api-key"))
        .and(body_partial_json(serde_json::json!({
            "instanceName": "main",
            "qrcode": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "instance": {"instanceName": "main", "status": "created"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    session::ensure_instance(&client, &instance("main"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_is_idempotent_via_precheck() {
    let (server, client) = setup_gateway_mock().await;
    mount_fetch_instances(&server, &["main"]).await;
    // No create mock mounted: an adoption via pre-check must not POST.

    session::ensure_instance(&client, &instance("main"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_adopts_on_conflict_rejection() {
    let (server, client) = setup_gateway_mock().await;
    mount_fetch_instances(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path("/instance/create"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({"error": "This name is already in use"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    session::ensure_instance(&client, &instance("main"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_open_state_maps_to_connected() {
    let (server, client) = setup_gateway_mock().await;
    mount_connection_state(&server, "main", "open").await;

    let state = session::connection_state(&client, &instance("main"))
        .await
        .unwrap();
    assert_eq!(state, SessionState::Connected);
}

#[tokio::test]
async fn test_other_states_map_to_disconnected() {
    let (server, client) = setup_gateway_mock().await;
    mount_connection_state(&server, "main", "connecting").await;

    let state = session::connection_state(&client, &instance("main"))
        .await
        .unwrap();
    assert_eq!(state, SessionState::Disconnected);
}

#[tokio::test]
async fn test_missing_instance_maps_to_not_found() {
    let (server, client) = setup_gateway_mock().await;
    Mock::given(method("GET"))
        .and(path("/instance/connectionState/ghost"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"error": "Instance not found"})),
        )
        .mount(&server)
        .await;

    let state = session::connection_state(&client, &instance("ghost"))
        .await
        .unwrap();
    assert_eq!(state, SessionState::NotFound);
}

#[tokio::test]
async fn test_delete_instance() {
    let (server, client) = setup_gateway_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/instance/delete/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "SUCCESS"
        })))
        .expect(1)
        .mount(&server)
        .await;

    session::delete_instance(&client, &instance("main"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_of_absent_instance_succeeds() {
    let (server, client) = setup_gateway_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/instance/delete/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Instance not found"))
        .mount(&server)
        .await;

    session::delete_instance(&client, &instance("ghost"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_failure_is_classified() {
    let (server, client) = setup_gateway_mock().await;
    mount_fetch_instances(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path("/instance/create"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = session::ensure_instance(&client, &instance("main"))
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::RemoteRejected { code: 401, .. }));
}

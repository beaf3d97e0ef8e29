//! Integration tests for pairing-artifact retrieval: the short-circuit
//! on connected sessions, the response-shape probing, and the
//! retry-once-then-report behavior.

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use skybridge_core::ports::messaging_gateway::{IMessagingGateway, PairingOutcome};
use skybridge_evolution::pairing;

use crate::common::{instance, mount_connection_state, setup_gateway_adapter, setup_gateway_mock};

async fn mount_connect(server: &wiremock::MockServer, name: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/instance/connect/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_artifact_from_each_known_shape() {
    let shapes = [
        serde_json::json!({"base64": "QR-payload"}),
        serde_json::json!({"qrcode": {"base64": "QR-payload"}}),
        serde_json::json!("QR-payload"),
        serde_json::json!({"instance": {"instanceName": "main", "qrcode": "QR-payload"}}),
    ];

    for shape in shapes {
        let (server, client) = setup_gateway_mock().await;
        mount_connect(&server, "main", shape.clone()).await;

        let outcome = pairing::request_artifact(&client, &instance("main"))
            .await
            .unwrap();
        match outcome {
            PairingOutcome::Artifact(artifact) => assert_eq!(artifact.payload, "QR-payload"),
            other => panic!("expected artifact for shape {shape}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_unknown_shape_retries_once_then_reports_unavailable() {
    let (server, client) = setup_gateway_mock().await;
    Mock::given(method("GET"))
        .and(path("/instance/connect/main"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"count": 0})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let outcome = pairing::request_artifact(&client, &instance("main"))
        .await
        .unwrap();
    assert_eq!(outcome, PairingOutcome::NotYetAvailable);
}

#[tokio::test]
async fn test_artifact_on_retry_is_returned() {
    let (server, client) = setup_gateway_mock().await;
    Mock::given(method("GET"))
        .and(path("/instance/connect/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_connect(&server, "main", serde_json::json!({"base64": "late-QR"})).await;

    let outcome = pairing::request_artifact(&client, &instance("main"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        PairingOutcome::Artifact(skybridge_core::ports::messaging_gateway::PairingArtifact {
            payload: "late-QR".to_string()
        })
    );
}

#[tokio::test]
async fn test_connected_session_short_circuits() {
    let (server, gateway) = setup_gateway_adapter().await;
    mount_connection_state(&server, "main", "open").await;
    // No connect endpoint mounted: the short-circuit must not call it.

    let outcome = gateway.pairing_artifact(&instance("main")).await.unwrap();
    assert_eq!(outcome, PairingOutcome::AlreadyConnected);
}

#[tokio::test]
async fn test_disconnected_session_requests_artifact() {
    let (server, gateway) = setup_gateway_adapter().await;
    mount_connection_state(&server, "main", "close").await;
    mount_connect(&server, "main", serde_json::json!({"base64": "QR"})).await;

    let outcome = gateway.pairing_artifact(&instance("main")).await.unwrap();
    assert!(matches!(outcome, PairingOutcome::Artifact(_)));
}

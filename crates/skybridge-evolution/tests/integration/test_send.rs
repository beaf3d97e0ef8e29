//! Integration tests for state-gated text sending.

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use skybridge_core::domain::errors::AdapterError;
use skybridge_core::ports::messaging_gateway::IMessagingGateway;

use crate::common::{instance, mount_connection_state, setup_gateway_adapter};

#[tokio::test]
async fn test_send_normalizes_recipient_and_returns_receipt() {
    let (server, gateway) = setup_gateway_adapter().await;
    mount_connection_state(&server, "main", "open").await;
    Mock::given(method("POST"))
        .and(path("/message/sendText/main"))
        .and(body_partial_json(serde_json::json!({
            "number": "5511987654321",
            "text": "hello",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "key": {"remoteJid": "5511987654321@s.whatsapp.net", "fromMe": true, "id": "MSG-1"},
            "status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = gateway
        .send_text(&instance("main"), "(11) 98765-4321", "hello")
        .await
        .unwrap();
    assert_eq!(receipt.message_id, "MSG-1");
    assert_eq!(receipt.recipient, "5511987654321");
}

#[tokio::test]
async fn test_send_on_disconnected_session_fails_fast() {
    let (server, gateway) = setup_gateway_adapter().await;
    mount_connection_state(&server, "main", "close").await;
    // No send endpoint mounted: the precondition must stop the call.

    let err = gateway
        .send_text(&instance("main"), "11987654321", "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::NotConnected(_)));
}

#[tokio::test]
async fn test_send_rejection_is_classified() {
    let (server, gateway) = setup_gateway_adapter().await;
    mount_connection_state(&server, "main", "open").await;
    Mock::given(method("POST"))
        .and(path("/message/sendText/main"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("number is not on whatsapp"),
        )
        .mount(&server)
        .await;

    let err = gateway
        .send_text(&instance("main"), "11987654321", "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::RemoteRejected { code: 400, .. }));
}

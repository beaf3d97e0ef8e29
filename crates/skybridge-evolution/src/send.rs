//! Message sending
//!
//! Sends are state-gated at the gateway composition layer; this module
//! only normalizes the recipient, issues the send, and maps the response
//! into a delivery receipt.

use chrono::Utc;
use reqwest::Method;
use serde::Deserialize;
use tracing::info;

use skybridge_core::domain::errors::AdapterError;
use skybridge_core::domain::newtypes::InstanceName;
use skybridge_core::ports::messaging_gateway::MessageReceipt;
use skybridge_core::retry::RetryPolicy;

use crate::client::{EvolutionClient, SEND_TIMEOUT};
use crate::phone::normalize_recipient;

/// Response body of the send-text endpoint
#[derive(Debug, Deserialize)]
struct SendResponse {
    key: MessageKey,
}

#[derive(Debug, Deserialize)]
struct MessageKey {
    id: String,
}

/// Sends a text message to a recipient
pub async fn send_text(
    client: &EvolutionClient,
    name: &InstanceName,
    recipient: &str,
    body: &str,
) -> Result<MessageReceipt, AdapterError> {
    let number = normalize_recipient(recipient);
    let path = format!("/message/sendText/{}", name.as_str());
    let payload = serde_json::json!({
        "number": number,
        "text": body,
    });

    let response = client
        .execute_with_retry(
            Method::POST,
            &path,
            Some(&payload),
            RetryPolicy::MUTATION,
            SEND_TIMEOUT,
        )
        .await?;

    let body: SendResponse = response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;

    info!(instance = %name, recipient = %number, message_id = %body.key.id, "Message accepted");
    Ok(MessageReceipt {
        message_id: body.key.id,
        recipient: number,
        accepted_at: Utc::now(),
    })
}

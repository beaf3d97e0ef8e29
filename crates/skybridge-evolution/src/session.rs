//! Instance lifecycle operations
//!
//! Creation is idempotent: a pre-check against `fetchInstances` adopts an
//! existing instance, and a 409 or "already in use" rejection on creation
//! is resolved the same way instead of failing.

use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};

use skybridge_core::domain::errors::AdapterError;
use skybridge_core::domain::newtypes::InstanceName;
use skybridge_core::ports::messaging_gateway::SessionState;
use skybridge_core::retry::RetryPolicy;

use crate::client::{EvolutionClient, LIFECYCLE_TIMEOUT, STATUS_TIMEOUT};

/// Gateway state string that maps to a connected session
const STATE_OPEN: &str = "open";

/// One instance as reported by `fetchInstances`
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceInfo {
    #[serde(rename = "instanceName", alias = "name")]
    pub instance_name: String,
    #[serde(default, rename = "connectionStatus", alias = "state")]
    pub connection_status: Option<String>,
}

/// Envelope used by gateway versions that nest the instance
#[derive(Debug, Clone, Deserialize)]
struct InstanceEnvelope {
    instance: InstanceInfo,
}

/// Response body of the connection-state endpoint
#[derive(Debug, Clone, Deserialize)]
struct ConnectionStateResponse {
    instance: ConnectionStateInstance,
}

#[derive(Debug, Clone, Deserialize)]
struct ConnectionStateInstance {
    #[serde(default)]
    state: Option<String>,
}

/// Lists the instances known to the gateway, optionally filtered by name
pub async fn fetch_instances(
    client: &EvolutionClient,
    name: Option<&InstanceName>,
) -> Result<Vec<InstanceInfo>, AdapterError> {
    let path = match name {
        Some(name) => format!("/instance/fetchInstances?instanceName={}", name.as_str()),
        None => "/instance/fetchInstances".to_string(),
    };
    let response = client
        .execute_with_retry(Method::GET, &path, None, RetryPolicy::READ, STATUS_TIMEOUT)
        .await?;

    // Older gateways return bare InstanceInfo objects, newer ones wrap
    // each in an envelope; accept both.
    let doc: serde_json::Value = response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
    let items = match doc {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    let mut instances = Vec::with_capacity(items.len());
    for item in items {
        if let Ok(envelope) = serde_json::from_value::<InstanceEnvelope>(item.clone()) {
            instances.push(envelope.instance);
        } else if let Ok(info) = serde_json::from_value::<InstanceInfo>(item) {
            instances.push(info);
        }
    }
    Ok(instances)
}

/// Whether the named instance exists at the gateway
pub async fn instance_exists(
    client: &EvolutionClient,
    name: &InstanceName,
) -> Result<bool, AdapterError> {
    let instances = fetch_instances(client, Some(name)).await?;
    Ok(instances
        .iter()
        .any(|i| i.instance_name == name.as_str()))
}

/// Creates the named instance, idempotently
pub async fn ensure_instance(
    client: &EvolutionClient,
    name: &InstanceName,
) -> Result<(), AdapterError> {
    if instance_exists(client, name).await.unwrap_or(false) {
        debug!(instance = %name, "Instance already exists, adopting");
        return Ok(());
    }

    let body = serde_json::json!({
        "instanceName": name.as_str(),
        "qrcode": true,
        "integration": "WHATSAPP-BAILEYS",
    });

    match client
        .execute_with_retry(
            Method::POST,
            "/instance/create",
            Some(&body),
            RetryPolicy::MUTATION,
            LIFECYCLE_TIMEOUT,
        )
        .await
    {
        Ok(_) => {
            info!(instance = %name, "Instance created");
            Ok(())
        }
        Err(err) if is_already_exists(&err) => {
            debug!(instance = %name, "Creation rejected as duplicate, adopting");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Whether a rejection means the instance already exists
fn is_already_exists(err: &AdapterError) -> bool {
    if err.is_conflict() {
        return true;
    }
    match err {
        AdapterError::RemoteRejected { message, .. } => {
            let lower = message.to_lowercase();
            lower.contains("already in use") || lower.contains("already exists")
        }
        _ => false,
    }
}

/// Queries the instance's connection state
///
/// Maps the gateway's `"open"` to [`SessionState::Connected`], a missing
/// instance to [`SessionState::NotFound`], anything else to
/// [`SessionState::Disconnected`].
pub async fn connection_state(
    client: &EvolutionClient,
    name: &InstanceName,
) -> Result<SessionState, AdapterError> {
    let path = format!("/instance/connectionState/{}", name.as_str());
    let result = client
        .execute_with_retry(Method::GET, &path, None, RetryPolicy::READ, STATUS_TIMEOUT)
        .await;

    let response = match result {
        Ok(response) => response,
        Err(err) if err.is_not_found() => return Ok(SessionState::NotFound),
        Err(err) => return Err(err),
    };

    let body: ConnectionStateResponse = response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;

    let state = match body.instance.state.as_deref() {
        Some(STATE_OPEN) => SessionState::Connected,
        _ => SessionState::Disconnected,
    };
    Ok(state)
}

/// Best-effort logout of the instance's device session
///
/// Errors are logged and swallowed: logout is a convenience on the way
/// to reconnection or teardown, never the critical step.
pub async fn logout(client: &EvolutionClient, name: &InstanceName) {
    let path = format!("/instance/logout/{}", name.as_str());
    let result = client
        .request(Method::DELETE, &path, LIFECYCLE_TIMEOUT)
        .send()
        .await;
    match result {
        Ok(response) if response.status().is_success() => {
            debug!(instance = %name, "Logged out")
        }
        Ok(response) => {
            warn!(instance = %name, status = %response.status(), "Logout did not take effect")
        }
        Err(err) => warn!(instance = %name, %err, "Logout request failed"),
    }
}

/// Deletes the instance at the gateway
pub async fn delete_instance(
    client: &EvolutionClient,
    name: &InstanceName,
) -> Result<(), AdapterError> {
    let path = format!("/instance/delete/{}", name.as_str());
    match client
        .execute_with_retry(
            Method::DELETE,
            &path,
            None,
            RetryPolicy::MUTATION,
            LIFECYCLE_TIMEOUT,
        )
        .await
    {
        Ok(_) => {
            info!(instance = %name, "Instance deleted");
            Ok(())
        }
        // Deleting an absent instance is the desired end state
        Err(err) if err.is_not_found() => Ok(()),
        Err(err) => Err(err),
    }
}

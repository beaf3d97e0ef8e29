//! Pairing-artifact retrieval
//!
//! The gateway's connect endpoint has shipped the QR payload under
//! several different response shapes across versions. Extraction runs an
//! ordered list of extractor functions against the generic JSON document
//! and takes the first non-empty match; cascading conditionals are
//! deliberately avoided.
//!
//! A response with no artifact is a transient-initialization condition:
//! the gateway often needs a moment after instance creation before a QR
//! is ready. One retry after a short fixed delay, then report
//! not-yet-available instead of raising.

use std::time::Duration;

use reqwest::Method;
use tracing::{debug, info};

use skybridge_core::domain::errors::AdapterError;
use skybridge_core::domain::newtypes::InstanceName;
use skybridge_core::ports::messaging_gateway::{PairingArtifact, PairingOutcome};

use crate::client::{EvolutionClient, STATUS_TIMEOUT};

/// Delay before the single retry when no artifact is present yet
const RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Known response shapes for the pairing payload, tried in order
///
/// 1. top-level `base64` field
/// 2. nested `qrcode.base64` field
/// 3. the whole document is a bare string
/// 4. alternate nested `instance.qrcode` field
const EXTRACTORS: &[fn(&serde_json::Value) -> Option<String>] = &[
    extract_top_level_base64,
    extract_nested_qrcode,
    extract_bare_string,
    extract_instance_qrcode,
];

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn extract_top_level_base64(doc: &serde_json::Value) -> Option<String> {
    non_empty(doc.get("base64").and_then(|v| v.as_str()))
}

fn extract_nested_qrcode(doc: &serde_json::Value) -> Option<String> {
    non_empty(
        doc.get("qrcode")
            .and_then(|q| q.get("base64"))
            .and_then(|v| v.as_str()),
    )
}

fn extract_bare_string(doc: &serde_json::Value) -> Option<String> {
    non_empty(doc.as_str())
}

fn extract_instance_qrcode(doc: &serde_json::Value) -> Option<String> {
    non_empty(
        doc.get("instance")
            .and_then(|i| i.get("qrcode"))
            .and_then(|v| v.as_str()),
    )
}

/// Probes the known response shapes for a pairing payload
pub fn extract_artifact(doc: &serde_json::Value) -> Option<PairingArtifact> {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(doc))
        .map(|payload| PairingArtifact { payload })
}

/// Requests a pairing artifact for an instance
///
/// Does not probe connection state; callers short-circuit to
/// `AlreadyConnected` before getting here.
pub async fn request_artifact(
    client: &EvolutionClient,
    name: &InstanceName,
) -> Result<PairingOutcome, AdapterError> {
    if let Some(artifact) = fetch_once(client, name).await? {
        return Ok(PairingOutcome::Artifact(artifact));
    }

    debug!(instance = %name, "No artifact yet, retrying once");
    tokio::time::sleep(RETRY_DELAY).await;

    match fetch_once(client, name).await? {
        Some(artifact) => Ok(PairingOutcome::Artifact(artifact)),
        None => {
            info!(instance = %name, "Pairing artifact not yet available");
            Ok(PairingOutcome::NotYetAvailable)
        }
    }
}

async fn fetch_once(
    client: &EvolutionClient,
    name: &InstanceName,
) -> Result<Option<PairingArtifact>, AdapterError> {
    let path = format!("/instance/connect/{}", name.as_str());
    let response = client
        .request(Method::GET, &path, STATUS_TIMEOUT)
        .send()
        .await
        .map_err(|e| AdapterError::RemoteUnavailable(e.to_string()))?;

    if !response.status().is_success() {
        return Err(crate::client::classify_error(response).await);
    }

    let doc: serde_json::Value = response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
    Ok(extract_artifact(&doc))
}

//! Messaging gateway port (driven/secondary port)
//!
//! Interface for a gateway that manages named messaging instances
//! (one logged-in device session each): create, pair via a scannable
//! artifact, query connection state, send text, tear down.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::AdapterError;
use crate::domain::newtypes::InstanceName;

/// Connection state of a messaging instance
///
/// The gateway's `"open"` state maps to `Connected`; a missing instance
/// maps to `NotFound`; every other reported state maps to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Connected,
    Disconnected,
    NotFound,
    Error,
}

/// The QR-code/linking payload issued to authorize a new device session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingArtifact {
    /// Scannable payload, typically a base64-encoded QR image or a
    /// pairing code string
    pub payload: String,
}

/// Result of requesting a pairing artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingOutcome {
    /// A fresh artifact to display for scanning
    Artifact(PairingArtifact),
    /// The instance is already connected; nothing to scan
    AlreadyConnected,
    /// The gateway has not produced an artifact yet; transient
    /// initialization condition, not a failure
    NotYetAvailable,
}

/// Delivery receipt for a sent message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReceipt {
    /// Gateway-assigned message id
    pub message_id: String,
    /// Normalized recipient the message was addressed to
    pub recipient: String,
    /// When the gateway accepted the message
    pub accepted_at: DateTime<Utc>,
}

/// Result of an auto-reconnect attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconnectOutcome {
    /// A new artifact must be scanned to finish reconnection
    ScanRequired(PairingArtifact),
    /// The session came back without a new pairing
    Reconnected,
    /// The gateway has not produced an artifact yet; retry later
    NotYetAvailable,
}

/// Port trait for messaging gateway operations
#[async_trait::async_trait]
pub trait IMessagingGateway: Send + Sync {
    /// Creates the named instance, idempotently
    ///
    /// If the instance already exists (detected via a pre-check list call
    /// or classified from an "already exists" rejection) the existing
    /// instance is adopted rather than failing.
    async fn ensure_instance(&self, name: &InstanceName) -> Result<(), AdapterError>;

    /// Requests a pairing artifact, short-circuiting when already connected
    async fn pairing_artifact(&self, name: &InstanceName)
        -> Result<PairingOutcome, AdapterError>;

    /// Queries the instance's connection state
    async fn connection_state(&self, name: &InstanceName) -> Result<SessionState, AdapterError>;

    /// Sends a text message; preconditioned on a connected session
    async fn send_text(
        &self,
        name: &InstanceName,
        recipient: &str,
        body: &str,
    ) -> Result<MessageReceipt, AdapterError>;

    /// Best-effort logout of the instance's device session
    async fn logout(&self, name: &InstanceName) -> Result<(), AdapterError>;

    /// Deletes the instance at the gateway
    async fn delete_instance(&self, name: &InstanceName) -> Result<(), AdapterError>;

    /// Composite recovery: logout, pause, recreate if missing, re-pair
    async fn auto_reconnect(&self, name: &InstanceName)
        -> Result<ReconnectOutcome, AdapterError>;
}

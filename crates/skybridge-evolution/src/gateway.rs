//! `IMessagingGateway` implementation backed by an Evolution API gateway
//!
//! Composition layer over the operation modules. Owns the two gated
//! behaviors: pairing short-circuits when the session is already
//! connected, and sends are preconditioned on a fresh state probe.
//! Auto-reconnect is the composite recovery procedure: best-effort
//! logout, a brief pause, recreation of a missing instance, then a new
//! pairing request.

use std::time::Duration;

use tracing::{info, warn};

use skybridge_core::config::GatewaySettings;
use skybridge_core::domain::errors::AdapterError;
use skybridge_core::domain::newtypes::InstanceName;
use skybridge_core::ports::messaging_gateway::{
    IMessagingGateway, MessageReceipt, PairingOutcome, ReconnectOutcome, SessionState,
};

use crate::client::EvolutionClient;
use crate::{pairing, send, session};

/// Pause between logout and the existence check during auto-reconnect;
/// the gateway needs a moment to settle the device session
const RECONNECT_PAUSE: Duration = Duration::from_secs(2);

/// Evolution API implementation of the messaging gateway port
pub struct EvolutionGateway {
    client: EvolutionClient,
}

impl EvolutionGateway {
    /// Creates a gateway adapter from validated connection settings
    pub fn new(settings: &GatewaySettings) -> Result<Self, AdapterError> {
        let client = EvolutionClient::from_settings(settings)?;
        Ok(Self { client })
    }

    /// Creates a gateway adapter around an existing client (useful for testing)
    pub fn with_client(client: EvolutionClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IMessagingGateway for EvolutionGateway {
    async fn ensure_instance(&self, name: &InstanceName) -> Result<(), AdapterError> {
        session::ensure_instance(&self.client, name).await
    }

    async fn pairing_artifact(
        &self,
        name: &InstanceName,
    ) -> Result<PairingOutcome, AdapterError> {
        if session::connection_state(&self.client, name).await? == SessionState::Connected {
            return Ok(PairingOutcome::AlreadyConnected);
        }
        pairing::request_artifact(&self.client, name).await
    }

    async fn connection_state(&self, name: &InstanceName) -> Result<SessionState, AdapterError> {
        session::connection_state(&self.client, name).await
    }

    async fn send_text(
        &self,
        name: &InstanceName,
        recipient: &str,
        body: &str,
    ) -> Result<MessageReceipt, AdapterError> {
        // Lightweight state probe immediately before the send
        let state = session::connection_state(&self.client, name).await?;
        if state != SessionState::Connected {
            return Err(AdapterError::NotConnected(name.to_string()));
        }
        send::send_text(&self.client, name, recipient, body).await
    }

    async fn logout(&self, name: &InstanceName) -> Result<(), AdapterError> {
        session::logout(&self.client, name).await;
        Ok(())
    }

    async fn delete_instance(&self, name: &InstanceName) -> Result<(), AdapterError> {
        session::delete_instance(&self.client, name).await
    }

    async fn auto_reconnect(
        &self,
        name: &InstanceName,
    ) -> Result<ReconnectOutcome, AdapterError> {
        info!(instance = %name, "Starting auto-reconnect");

        session::logout(&self.client, name).await;
        tokio::time::sleep(RECONNECT_PAUSE).await;

        match session::instance_exists(&self.client, name).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(instance = %name, "Instance missing after logout, recreating");
                session::ensure_instance(&self.client, name).await?;
            }
            Err(err) => return Err(err),
        }

        match self.pairing_artifact(name).await? {
            PairingOutcome::Artifact(artifact) => Ok(ReconnectOutcome::ScanRequired(artifact)),
            PairingOutcome::AlreadyConnected => {
                info!(instance = %name, "Session reconnected without re-pairing");
                Ok(ReconnectOutcome::Reconnected)
            }
            PairingOutcome::NotYetAvailable => Ok(ReconnectOutcome::NotYetAvailable),
        }
    }
}

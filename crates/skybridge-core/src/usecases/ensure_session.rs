//! Messaging session setup and status bookkeeping
//!
//! Ensures the named gateway instance exists (idempotently), mirrors it
//! as a `MessagingInstance` row, and records the last-known connection
//! state with a timestamp in the settings store so the host application
//! can show status without a gateway round-trip.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::entity::RemoteEntity;
use crate::domain::errors::AdapterError;
use crate::domain::newtypes::InstanceName;
use crate::ports::messaging_gateway::{IMessagingGateway, SessionState};
use crate::ports::IMirrorStore;

/// Settings key for the last-known connection state
pub const SETTING_LAST_STATE: &str = "gateway.last_state";
/// Settings key for when the state was last checked (RFC 3339)
pub const SETTING_LAST_CHECKED: &str = "gateway.last_checked";

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Connected => "connected",
        SessionState::Disconnected => "disconnected",
        SessionState::NotFound => "not_found",
        SessionState::Error => "error",
    }
}

/// Use case for establishing and tracking a messaging session
pub struct EnsureSessionUseCase {
    gateway: Arc<dyn IMessagingGateway>,
    mirror: Arc<dyn IMirrorStore>,
}

impl EnsureSessionUseCase {
    /// Creates a new EnsureSessionUseCase with the required adapters
    pub fn new(gateway: Arc<dyn IMessagingGateway>, mirror: Arc<dyn IMirrorStore>) -> Self {
        Self { gateway, mirror }
    }

    /// Ensures the instance exists and records its current state
    pub async fn ensure(&self, name: &InstanceName) -> Result<RemoteEntity, AdapterError> {
        self.gateway.ensure_instance(name).await?;
        let state = self.gateway.connection_state(name).await?;
        info!(instance = %name, state = state_label(state), "Messaging session ensured");

        let entity = self.mirror.upsert_instance(name).await?;
        self.record_state(state).await?;
        Ok(entity)
    }

    /// Probes the current state and refreshes the settings store
    pub async fn refresh_state(&self, name: &InstanceName) -> Result<SessionState, AdapterError> {
        let state = self.gateway.connection_state(name).await?;
        self.record_state(state).await?;
        Ok(state)
    }

    async fn record_state(&self, state: SessionState) -> Result<(), AdapterError> {
        self.mirror
            .put_setting(SETTING_LAST_STATE, state_label(state))
            .await?;
        self.mirror
            .put_setting(SETTING_LAST_CHECKED, &Utc::now().to_rfc3339())
            .await
    }
}

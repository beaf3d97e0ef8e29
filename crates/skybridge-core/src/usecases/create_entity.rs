//! Folder creation with local-only fallback
//!
//! Creates a folder remotely and reconciles the mirror. When the remote
//! call cannot complete at the transport level, the use case degrades to
//! a local-only placeholder row instead of propagating the error - except
//! on the upload-prerequisite path, where the error must surface because
//! the upload cannot proceed against a folder that does not exist.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entity::{EntityKind, RemoteEntity};
use crate::domain::errors::AdapterError;
use crate::domain::newtypes::{LocalId, RemoteId};
use crate::ports::{IMirrorStore, IRemoteStore};

/// Use case for creating folders with the degraded-fallback contract
pub struct CreateEntityUseCase {
    remote: Arc<dyn IRemoteStore>,
    mirror: Arc<dyn IMirrorStore>,
}

impl CreateEntityUseCase {
    /// Creates a new CreateEntityUseCase with the required adapters
    pub fn new(remote: Arc<dyn IRemoteStore>, mirror: Arc<dyn IMirrorStore>) -> Self {
        Self { remote, mirror }
    }

    /// Resolves the mirror-side parent reference for a remote parent id
    async fn resolve_parent(
        &self,
        parent: Option<&RemoteId>,
    ) -> Result<Option<LocalId>, AdapterError> {
        match parent {
            None => Ok(None),
            Some(remote_id) => Ok(self
                .mirror
                .find_by_remote_id(remote_id)
                .await?
                .map(|e| e.local_id)),
        }
    }

    /// Creates a folder, degrading to a local-only placeholder on
    /// transport failure
    ///
    /// A 409/already-exists rejection is resolved idempotently: the
    /// existing remote folder is located by name and adopted into the
    /// mirror instead of failing.
    pub async fn create_folder(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteEntity, AdapterError> {
        let parent_ref = self.resolve_parent(parent).await?;

        match self.remote.create_folder(name, parent).await {
            Ok(descriptor) => {
                debug!(id = %descriptor.id, name, "Folder created remotely");
                self.mirror.upsert_remote(&descriptor, parent_ref).await
            }
            Err(AdapterError::RemoteUnavailable(reason)) => {
                warn!(name, %reason, "Remote create failed, inserting local-only placeholder");
                self.mirror
                    .insert_local_only(name, EntityKind::Folder, parent_ref)
                    .await
            }
            Err(err) if err.is_conflict() => {
                debug!(name, "Folder already exists remotely, adopting it");
                self.adopt_existing(name, parent, parent_ref, err).await
            }
            Err(err) => Err(err),
        }
    }

    /// Creates a folder as an upload prerequisite
    ///
    /// Unlike [`create_folder`](Self::create_folder) this propagates
    /// transport failures: a placeholder cannot receive an upload.
    pub async fn create_folder_for_upload(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<RemoteEntity, AdapterError> {
        let parent_ref = self.resolve_parent(parent).await?;

        match self.remote.create_folder(name, parent).await {
            Ok(descriptor) => self.mirror.upsert_remote(&descriptor, parent_ref).await,
            Err(err) if err.is_conflict() => {
                self.adopt_existing(name, parent, parent_ref, err).await
            }
            Err(err) => Err(err),
        }
    }

    /// Locates the conflicting remote folder by name and mirrors it
    ///
    /// Falls back to the original conflict error if the folder cannot be
    /// found (e.g., it was removed between the create and the lookup).
    async fn adopt_existing(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
        parent_ref: Option<LocalId>,
        original: AdapterError,
    ) -> Result<RemoteEntity, AdapterError> {
        let siblings = self.remote.list_children(parent, Some(name)).await?;
        match siblings
            .into_iter()
            .find(|d| d.is_folder && d.name == name)
        {
            Some(descriptor) => self.mirror.upsert_remote(&descriptor, parent_ref).await,
            None => Err(original),
        }
    }
}

//! `IRemoteStore` implementation backed by Google Drive
//!
//! Thin composition layer: resolves `None` parents to the configured
//! root folder and delegates to the operation modules. All retry and
//! error classification happens below this layer.

use skybridge_core::config::DriveSettings;
use skybridge_core::domain::errors::{AdapterError, SoftOutcome};
use skybridge_core::domain::newtypes::RemoteId;
use skybridge_core::ports::remote_store::{DownloadedContent, EntityDescriptor, IRemoteStore};

use crate::client::DriveClient;
use crate::{download, files, upload};

/// Google Drive implementation of the remote store port
pub struct DriveProvider {
    client: DriveClient,
    root: RemoteId,
}

impl DriveProvider {
    /// Creates a provider from validated settings and a minted access token
    pub fn new(
        settings: &DriveSettings,
        access_token: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        let client = DriveClient::from_settings(settings, access_token)?;
        let root = settings
            .root_folder_id
            .parse()
            .map_err(|e| AdapterError::ConfigIncomplete(format!("drive.root_folder_id: {e}")))?;
        Ok(Self { client, root })
    }

    /// Creates a provider around an existing client (useful for testing)
    pub fn with_client(client: DriveClient, root: RemoteId) -> Self {
        Self { client, root }
    }

    fn resolve_parent<'a>(&'a self, parent: Option<&'a RemoteId>) -> &'a RemoteId {
        parent.unwrap_or(&self.root)
    }
}

#[async_trait::async_trait]
impl IRemoteStore for DriveProvider {
    fn root_id(&self) -> RemoteId {
        self.root.clone()
    }

    async fn list_children(
        &self,
        parent: Option<&RemoteId>,
        search: Option<&str>,
    ) -> Result<Vec<EntityDescriptor>, AdapterError> {
        files::list_children(&self.client, self.resolve_parent(parent), search).await
    }

    async fn get_metadata(&self, id: &RemoteId) -> Result<EntityDescriptor, AdapterError> {
        files::get_metadata(&self.client, id).await
    }

    async fn create_folder(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<EntityDescriptor, AdapterError> {
        files::create_folder(&self.client, name, self.resolve_parent(parent)).await
    }

    async fn upload(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
        content: Vec<u8>,
        mime_type: &str,
    ) -> Result<EntityDescriptor, AdapterError> {
        upload::upload(
            &self.client,
            name,
            self.resolve_parent(parent),
            content,
            mime_type,
        )
        .await
    }

    async fn download(&self, id: &RemoteId) -> Result<DownloadedContent, AdapterError> {
        download::download(&self.client, id).await
    }

    async fn delete(&self, id: &RemoteId) -> Result<(), AdapterError> {
        files::delete(&self.client, id).await
    }

    async fn move_entity(
        &self,
        id: &RemoteId,
        new_parent: &RemoteId,
    ) -> Result<(), AdapterError> {
        files::move_entity(&self.client, id, new_parent).await
    }

    async fn rename(&self, id: &RemoteId, new_name: &str) -> Result<SoftOutcome, AdapterError> {
        files::rename(&self.client, id, new_name).await
    }

    async fn set_trashed(
        &self,
        id: &RemoteId,
        trashed: bool,
    ) -> Result<SoftOutcome, AdapterError> {
        files::set_trashed(&self.client, id, trashed).await
    }
}

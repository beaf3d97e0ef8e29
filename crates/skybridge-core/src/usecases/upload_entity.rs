//! Upload orchestration
//!
//! Uploads are the one creation path that must not degrade to a
//! placeholder: the caller handed over content that would otherwise be
//! silently dropped. Failures propagate after the adapter's retry policy
//! is exhausted. The adapter owns the size-based transfer strategy; this
//! use case owns parent resolution and mirror reconciliation.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entity::RemoteEntity;
use crate::domain::errors::AdapterError;
use crate::domain::newtypes::RemoteId;
use crate::ports::{IMirrorStore, IRemoteStore};

/// Use case for uploading file content
pub struct UploadEntityUseCase {
    remote: Arc<dyn IRemoteStore>,
    mirror: Arc<dyn IMirrorStore>,
}

impl UploadEntityUseCase {
    /// Creates a new UploadEntityUseCase with the required adapters
    pub fn new(remote: Arc<dyn IRemoteStore>, mirror: Arc<dyn IMirrorStore>) -> Self {
        Self { remote, mirror }
    }

    /// Uploads content as a new file under a parent folder
    ///
    /// # Errors
    /// Propagates every classified failure; no local-only fallback exists
    /// for uploads.
    pub async fn upload(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
        content: Vec<u8>,
        mime_type: &str,
    ) -> Result<RemoteEntity, AdapterError> {
        let parent_ref = match parent {
            None => None,
            Some(remote_id) => self
                .mirror
                .find_by_remote_id(remote_id)
                .await?
                .map(|e| e.local_id),
        };

        debug!(name, size = content.len(), "Uploading entity");
        let descriptor = self.remote.upload(name, parent, content, mime_type).await?;
        self.mirror.upsert_remote(&descriptor, parent_ref).await
    }
}

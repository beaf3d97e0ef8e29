//! Re-parenting with a self-healing mirror
//!
//! The destination's local parent row is resolved by `remote_id`. When
//! the mirror has never seen the destination (created from another
//! device, or simply never listed), its metadata is fetched and
//! materialized into the mirror before completing the move.

use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::AdapterError;
use crate::domain::newtypes::RemoteId;
use crate::ports::{IMirrorStore, IRemoteStore};
use crate::usecases::materialize::materialize_remote_row;

/// Use case for moving entities between folders
pub struct MoveEntityUseCase {
    remote: Arc<dyn IRemoteStore>,
    mirror: Arc<dyn IMirrorStore>,
}

impl MoveEntityUseCase {
    /// Creates a new MoveEntityUseCase with the required adapters
    pub fn new(remote: Arc<dyn IRemoteStore>, mirror: Arc<dyn IMirrorStore>) -> Self {
        Self { remote, mirror }
    }

    /// Moves an entity under a new parent folder
    ///
    /// # Errors
    /// - [`AdapterError::LocalOnlyUnsupported`] when the entity only
    ///   exists as a local placeholder.
    /// - Any classified error from the metadata fetch or the move call.
    pub async fn move_to(&self, id: &RemoteId, new_parent: &RemoteId) -> Result<(), AdapterError> {
        if let Some(row) = self.mirror.find_by_remote_id(id).await? {
            if !row.is_addressable_remotely() {
                return Err(AdapterError::LocalOnlyUnsupported(row.name));
            }
        }

        let destination =
            materialize_remote_row(self.remote.as_ref(), self.mirror.as_ref(), new_parent).await?;

        self.remote.move_entity(id, new_parent).await?;
        self.mirror
            .set_parent(id, Some(destination.local_id))
            .await?;

        debug!(id = %id, parent = %new_parent, "Entity moved and mirror re-parented");
        Ok(())
    }
}

//! Listing with read-through reconciliation
//!
//! Listing asks the provider for the current children, upserts every
//! descriptor into the mirror, and then answers from the mirror - so
//! local-only placeholder rows appear alongside freshly reconciled
//! remote rows, and a transport failure degrades to the last mirrored
//! state instead of an error.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entity::RemoteEntity;
use crate::domain::errors::AdapterError;
use crate::domain::newtypes::{LocalId, RemoteId};
use crate::ports::{IMirrorStore, IRemoteStore};
use crate::usecases::materialize::materialize_remote_row;

/// Use case for browsing one level of the mirrored tree
pub struct ListEntitiesUseCase {
    remote: Arc<dyn IRemoteStore>,
    mirror: Arc<dyn IMirrorStore>,
}

impl ListEntitiesUseCase {
    /// Creates a new ListEntitiesUseCase with the required adapters
    pub fn new(remote: Arc<dyn IRemoteStore>, mirror: Arc<dyn IMirrorStore>) -> Self {
        Self { remote, mirror }
    }

    /// Lists the children of a parent (`None` = configured root),
    /// optionally filtered by a case-insensitive name search
    pub async fn list(
        &self,
        parent: Option<&RemoteId>,
        search: Option<&str>,
    ) -> Result<Vec<RemoteEntity>, AdapterError> {
        let parent_ref = self.resolve_parent(parent).await?;

        match self.remote.list_children(parent, search).await {
            Ok(descriptors) => {
                debug!(count = descriptors.len(), "Reconciling listed descriptors");
                for descriptor in &descriptors {
                    self.mirror.upsert_remote(descriptor, parent_ref).await?;
                }
            }
            Err(AdapterError::RemoteUnavailable(reason)) => {
                // Serve the last mirrored state; reconciliation happens on
                // the next successful read.
                warn!(%reason, "Remote listing unavailable, serving mirror state");
            }
            Err(err) => return Err(err),
        }

        let mut rows = self.mirror.children_of(parent_ref.as_ref()).await?;
        if let Some(term) = search {
            let term = term.to_lowercase();
            rows.retain(|e| e.name.to_lowercase().contains(&term));
        }
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    /// Resolves the parent to its mirror row, materializing it when the
    /// mirror has not seen the folder yet
    ///
    /// Listing must scope to the requested folder's own `local_id`; an
    /// unknown parent is never allowed to alias the mirror root.
    async fn resolve_parent(
        &self,
        parent: Option<&RemoteId>,
    ) -> Result<Option<LocalId>, AdapterError> {
        match parent {
            None => Ok(None),
            Some(remote_id) => {
                let row =
                    materialize_remote_row(self.remote.as_ref(), self.mirror.as_ref(), remote_id)
                        .await?;
                Ok(Some(row.local_id))
            }
        }
    }
}

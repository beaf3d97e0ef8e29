//! Recursive deletion with partial-failure accumulation
//!
//! Folder deletion runs as an explicit worklist rather than implicit
//! recursion-through-the-provider: collect the children, partition by
//! kind, delete files first, recurse into sub-folders, then delete the
//! folder itself. Each child deletion is attempted independently and
//! failures are collected, not fatal to the siblings. Mirror rows are
//! soft-deleted so the audit trail and restore both keep working.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entity::MAX_TREE_DEPTH;
use crate::domain::errors::AdapterError;
use crate::domain::newtypes::RemoteId;
use crate::ports::{IMirrorStore, IRemoteStore};

/// Accumulated result of a (possibly recursive) delete
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Remote ids deleted, in deletion order (children before parents)
    pub deleted: Vec<RemoteId>,
    /// Children whose deletion failed, with the classified reason
    pub failures: Vec<(RemoteId, String)>,
}

impl DeleteReport {
    /// Whether every attempted deletion succeeded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Use case for deleting entities remotely and soft-deleting mirror rows
pub struct DeleteEntityUseCase {
    remote: Arc<dyn IRemoteStore>,
    mirror: Arc<dyn IMirrorStore>,
}

impl DeleteEntityUseCase {
    /// Creates a new DeleteEntityUseCase with the required adapters
    pub fn new(remote: Arc<dyn IRemoteStore>, mirror: Arc<dyn IMirrorStore>) -> Self {
        Self { remote, mirror }
    }

    /// Deletes an entity, recursing into folder contents when asked
    ///
    /// # Errors
    /// - [`AdapterError::NotEmpty`] when the entity is a folder with
    ///   children and `recursive` is false; nothing is deleted.
    /// - Any classified error from deleting the entity itself. Child
    ///   failures do not error; they accumulate in the report.
    pub async fn delete(
        &self,
        id: &RemoteId,
        recursive: bool,
    ) -> Result<DeleteReport, AdapterError> {
        // Local-only placeholders have no remote counterpart; drop the
        // mirror row and stop.
        if let Some(row) = self.mirror.find_by_remote_id(id).await? {
            if row.is_local_only {
                debug!(id = %id, "Soft-deleting local-only placeholder");
                self.mirror.set_trashed(id, true).await?;
                let mut report = DeleteReport::default();
                report.deleted.push(id.clone());
                return Ok(report);
            }
        }

        let descriptor = self.remote.get_metadata(id).await?;
        let mut report = DeleteReport::default();

        if descriptor.is_folder {
            let children = self.remote.list_children(Some(id), None).await?;
            if !children.is_empty() && !recursive {
                return Err(AdapterError::NotEmpty(descriptor.name));
            }
            self.delete_folder_contents(id, &mut report, 1).await?;
        }

        match self.remote.delete(id).await {
            Ok(()) => {
                self.mirror.set_trashed(id, true).await?;
                report.deleted.push(id.clone());
                Ok(report)
            }
            Err(err) if !report.failures.is_empty() => {
                // Children failed first; the folder delete failing as a
                // consequence is part of the same partial outcome.
                warn!(id = %id, %err, "Folder delete failed after child failures");
                report.failures.push((id.clone(), err.to_string()));
                Ok(report)
            }
            Err(err) => Err(err),
        }
    }

    /// Worklist pass over one folder's children
    ///
    /// Files are deleted first, each independently; sub-folders recurse
    /// depth-first via a boxed self-call. The depth bound catches listing
    /// cycles the provider should never report but the recursion must not
    /// follow forever.
    async fn delete_folder_contents(
        &self,
        folder: &RemoteId,
        report: &mut DeleteReport,
        depth: usize,
    ) -> Result<(), AdapterError> {
        if depth > MAX_TREE_DEPTH {
            return Err(AdapterError::InvalidResponse(format!(
                "folder nesting under {folder} exceeds {MAX_TREE_DEPTH} levels"
            )));
        }

        let children = self.remote.list_children(Some(folder), None).await?;

        let (folders, files): (Vec<_>, Vec<_>) =
            children.into_iter().partition(|child| child.is_folder);

        for file in files {
            let child_id = RemoteId::new(file.id.clone())
                .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
            match self.remote.delete(&child_id).await {
                Ok(()) => {
                    self.mirror.set_trashed(&child_id, true).await?;
                    report.deleted.push(child_id);
                }
                Err(err) => {
                    warn!(id = %child_id, %err, "Child delete failed, continuing with siblings");
                    report.failures.push((child_id, err.to_string()));
                }
            }
        }

        for sub in folders {
            let sub_id = RemoteId::new(sub.id.clone())
                .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
            Box::pin(self.delete_folder_contents(&sub_id, report, depth + 1)).await?;

            match self.remote.delete(&sub_id).await {
                Ok(()) => {
                    self.mirror.set_trashed(&sub_id, true).await?;
                    report.deleted.push(sub_id);
                }
                Err(err) => {
                    warn!(id = %sub_id, %err, "Sub-folder delete failed, continuing with siblings");
                    report.failures.push((sub_id, err.to_string()));
                }
            }
        }

        Ok(())
    }

    /// Restores a soft-deleted entity in both the provider and the mirror
    pub async fn restore(&self, id: &RemoteId) -> Result<(), AdapterError> {
        if let Some(row) = self.mirror.find_by_remote_id(id).await? {
            if !row.is_local_only {
                // Best-effort: a degraded untrash still restores the
                // mirror row, so the entity reappears locally.
                let outcome = self.remote.set_trashed(id, false).await?;
                if !outcome.applied() {
                    warn!(id = %id, "Remote untrash degraded, restoring mirror row only");
                }
            }
        }
        self.mirror.set_trashed(id, false).await
    }
}

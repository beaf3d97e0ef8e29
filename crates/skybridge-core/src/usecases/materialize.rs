//! Mirror materialization of remote rows seen out of order
//!
//! Listing or moving into a folder the mirror has never seen must not
//! fall back to the root scope: the folder's descriptor is fetched and
//! inserted first, so the operation targets its real `local_id`. When
//! the fetched descriptor names an ancestor the mirror does not know
//! either, the new row is flagged inconsistent and stays out of tree
//! listings until a later reconciliation resolves its parent chain.

use tracing::debug;

use crate::domain::entity::RemoteEntity;
use crate::domain::errors::AdapterError;
use crate::domain::newtypes::{LocalId, RemoteId};
use crate::ports::{IMirrorStore, IRemoteStore};

/// Returns the mirror row for a remote id, fetching and inserting it
/// when the mirror has not seen it yet
pub(crate) async fn materialize_remote_row(
    remote: &dyn IRemoteStore,
    mirror: &dyn IMirrorStore,
    id: &RemoteId,
) -> Result<RemoteEntity, AdapterError> {
    if let Some(row) = mirror.find_by_remote_id(id).await? {
        return Ok(row);
    }

    debug!(id = %id, "Row missing from mirror, materializing from remote");
    let descriptor = remote.get_metadata(id).await?;

    let (ancestor_ref, resolved) = resolve_ancestor(remote, mirror, &descriptor.parent_id).await?;

    let mut row = mirror.upsert_remote(&descriptor, ancestor_ref).await?;
    if !resolved {
        debug!(id = %id, "Ancestor unknown to mirror, flagging row inconsistent");
        mirror.mark_inconsistent(id, true).await?;
        row.is_inconsistent = true;
    }
    Ok(row)
}

/// Maps a descriptor's remote parent id onto a mirror reference
///
/// The configured root maps to `None` (the top of the mirrored tree) and
/// counts as resolved; any other unknown ancestor yields `None` with
/// `resolved = false`.
async fn resolve_ancestor(
    remote: &dyn IRemoteStore,
    mirror: &dyn IMirrorStore,
    parent_id: &Option<String>,
) -> Result<(Option<LocalId>, bool), AdapterError> {
    let Some(parent_id) = parent_id else {
        return Ok((None, true));
    };
    if parent_id == remote.root_id().as_str() {
        return Ok((None, true));
    }
    let ancestor = match RemoteId::new(parent_id.clone()) {
        Ok(ancestor_id) => mirror.find_by_remote_id(&ancestor_id).await?,
        Err(_) => None,
    };
    match ancestor {
        Some(row) => Ok((Some(row.local_id), true)),
        None => Ok((None, false)),
    }
}

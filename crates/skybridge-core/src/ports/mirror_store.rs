//! Mirror store port (driven/secondary port)
//!
//! Interface for the local relational mirror of remote entity metadata,
//! plus the key-value settings store holding last-known connection
//! status. The remote call and the mirror write are not atomic together;
//! reconciliation on the next read is the only repair mechanism.

use crate::domain::entity::{EntityKind, RemoteEntity};
use crate::domain::errors::AdapterError;
use crate::domain::newtypes::{LocalId, RemoteId};
use crate::ports::remote_store::EntityDescriptor;

/// Port trait for the local mirror store
#[async_trait::async_trait]
pub trait IMirrorStore: Send + Sync {
    /// Insert or update a row keyed by `remote_id`
    ///
    /// `parent_ref` carries the resolved local parent. An update clears
    /// the local-only and inconsistent flags: a fresh descriptor means
    /// the row was just reconciled. Callers that could not resolve the
    /// parent chain flag the row via [`mark_inconsistent`] afterwards so
    /// it stays out of tree listings until reconciled.
    ///
    /// [`mark_inconsistent`]: IMirrorStore::mark_inconsistent
    async fn upsert_remote(
        &self,
        descriptor: &EntityDescriptor,
        parent_ref: Option<LocalId>,
    ) -> Result<RemoteEntity, AdapterError>;

    /// Insert a local-only placeholder row with a synthesized id
    async fn insert_local_only(
        &self,
        name: &str,
        kind: EntityKind,
        parent_ref: Option<LocalId>,
    ) -> Result<RemoteEntity, AdapterError>;

    /// Insert or update the row mirroring a messaging instance
    ///
    /// Instances are parentless rows of kind
    /// [`EntityKind::MessagingInstance`] keyed by the instance name.
    async fn upsert_instance(
        &self,
        name: &crate::domain::newtypes::InstanceName,
    ) -> Result<RemoteEntity, AdapterError>;

    /// Look up a row by its provider-assigned id
    async fn find_by_remote_id(
        &self,
        remote_id: &RemoteId,
    ) -> Result<Option<RemoteEntity>, AdapterError>;

    /// Look up a row by its surrogate key
    async fn find_by_local_id(&self, id: &LocalId) -> Result<Option<RemoteEntity>, AdapterError>;

    /// List non-trashed, consistent children of a parent (`None` = root)
    async fn children_of(
        &self,
        parent_ref: Option<&LocalId>,
    ) -> Result<Vec<RemoteEntity>, AdapterError>;

    /// Set or clear the soft-delete marker
    async fn set_trashed(&self, remote_id: &RemoteId, trashed: bool) -> Result<(), AdapterError>;

    /// Re-parent a row
    async fn set_parent(
        &self,
        remote_id: &RemoteId,
        parent_ref: Option<LocalId>,
    ) -> Result<(), AdapterError>;

    /// Flag or clear the inconsistent marker on a row
    async fn mark_inconsistent(
        &self,
        remote_id: &RemoteId,
        inconsistent: bool,
    ) -> Result<(), AdapterError>;

    /// Read a settings value (e.g., last-known connection status)
    async fn get_setting(&self, key: &str) -> Result<Option<String>, AdapterError>;

    /// Write a settings value, stamping the update time
    async fn put_setting(&self, key: &str, value: &str) -> Result<(), AdapterError>;
}

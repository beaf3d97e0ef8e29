//! RemoteEntity - the local mirror's view of a remote object
//!
//! A `RemoteEntity` mirrors one remote file, folder, or messaging instance
//! so the application can browse without a remote round-trip. Rows are
//! created on successful remote mutation, or as `is_local_only` fallbacks
//! when the remote call that should have created them failed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{LocalId, RemoteId};

/// Maximum parent-chain depth; a chain that does not terminate at a null
/// root within this bound is treated as inconsistent.
pub const MAX_TREE_DEPTH: usize = 64;

/// Kind of remote object a mirror row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A regular file
    File,
    /// A folder that may own children
    Folder,
    /// A named messaging session at the gateway
    MessagingInstance,
}

impl EntityKind {
    /// Stable string form used by the mirror store
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
            Self::MessagingInstance => "messaging_instance",
        }
    }

    /// Parse the stored string form
    pub fn parse(s: &str) -> Result<Self, super::errors::DomainError> {
        match s {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            "messaging_instance" => Ok(Self::MessagingInstance),
            other => Err(super::errors::DomainError::InvalidKind(other.to_string())),
        }
    }
}

/// A mirror row for one remote entity
///
/// `local_id` is the stable surrogate key; `remote_id` is the provider's
/// identifier, synthesized for local-only fallback rows. Trashed rows are
/// excluded from default listings but remain addressable for restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntity {
    /// Locally assigned surrogate key
    pub local_id: LocalId,
    /// Provider-assigned id, or a synthesized `local-` id for fallbacks
    pub remote_id: RemoteId,
    /// Ownership link to the parent row; `None` at the root
    pub parent_ref: Option<LocalId>,
    /// What the remote object is
    pub kind: EntityKind,
    /// Display name
    pub name: String,
    /// Soft-delete marker
    pub is_trashed: bool,
    /// True when the entity exists only in the mirror because the remote
    /// create failed
    pub is_local_only: bool,
    /// True when the parent chain could not be resolved; excluded from
    /// tree listings until reconciled
    pub is_inconsistent: bool,
    /// Size in bytes, when the provider reports one
    pub size: Option<u64>,
    /// MIME type, when the provider reports one
    pub mime_type: Option<String>,
    /// Identity that created the remote object
    pub created_by: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub modified_at: DateTime<Utc>,
}

impl RemoteEntity {
    /// Build a mirror row for an object that exists remotely
    #[must_use]
    pub fn from_remote(
        remote_id: RemoteId,
        name: String,
        kind: EntityKind,
        parent_ref: Option<LocalId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            local_id: LocalId::new(),
            remote_id,
            parent_ref,
            kind,
            name,
            is_trashed: false,
            is_local_only: false,
            is_inconsistent: false,
            size: None,
            mime_type: None,
            created_by: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Build a local-only fallback row with a synthesized id
    ///
    /// Used when the remote create failed at the transport level so the
    /// UI can still show a placeholder node.
    #[must_use]
    pub fn local_only(name: String, kind: EntityKind, parent_ref: Option<LocalId>) -> Self {
        let mut entity = Self::from_remote(RemoteId::synthesize(), name, kind, parent_ref);
        entity.is_local_only = true;
        entity
    }

    /// Whether this entity may be addressed by remote operations
    ///
    /// Local-only fallbacks have no remote counterpart: sharing,
    /// permissioning, and export must refuse them.
    #[must_use]
    pub fn is_addressable_remotely(&self) -> bool {
        !self.is_local_only
    }

    /// Whether this row appears in default tree listings
    #[must_use]
    pub fn is_listed(&self) -> bool {
        !self.is_trashed && !self.is_inconsistent
    }

    /// Mark the row trashed (soft delete) and touch the mutation time
    pub fn trash(&mut self) {
        self.is_trashed = true;
        self.modified_at = Utc::now();
    }

    /// Clear the trashed marker (restore)
    pub fn restore(&mut self) {
        self.is_trashed = false;
        self.modified_at = Utc::now();
    }
}

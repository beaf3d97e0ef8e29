//! Remote store port (driven/secondary port)
//!
//! Interface for the cloud file-storage provider. The primary
//! implementation targets Google Drive v3, but the trait is
//! provider-agnostic: operations speak in opaque remote ids and
//! port-level DTOs.
//!
//! ## Design Notes
//!
//! - Returns the classified [`AdapterError`] taxonomy so no
//!   provider-specific error type crosses the boundary.
//! - Uses `#[async_trait]` for async trait methods.
//! - [`EntityDescriptor`] is a port-level DTO, not a domain entity; use
//!   cases are responsible for mapping it into mirror rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{AdapterError, SoftOutcome};
use crate::domain::newtypes::RemoteId;

/// OAuth tokens minted from the stored refresh token
///
/// Minted once when the provider adapter is built; callers rebuild the
/// adapter to obtain a fresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokens {
    /// Bearer token for authenticating API requests
    pub access_token: String,
    /// Refresh token for minting new access tokens without user interaction
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

/// Raw metadata of one remote entity as reported by the provider
///
/// Use cases map descriptors into [`RemoteEntity`](crate::domain::RemoteEntity)
/// mirror rows during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Provider-assigned identifier
    pub id: String,
    /// Entity name
    pub name: String,
    /// Provider MIME type (folders carry the provider's folder type)
    pub mime_type: Option<String>,
    /// Size in bytes (absent for folders)
    pub size: Option<u64>,
    /// Provider id of the owning folder (absent at the root)
    pub parent_id: Option<String>,
    /// Whether the entity is a folder
    pub is_folder: bool,
    /// Whether the provider reports the entity as trashed
    pub trashed: bool,
    /// Last modification time
    pub modified: Option<DateTime<Utc>>,
    /// Identity that created the entity
    pub created_by: Option<String>,
}

/// Bytes fetched for a download, with the name and type to serve them under
#[derive(Debug, Clone)]
pub struct DownloadedContent {
    /// Raw content bytes
    pub bytes: Vec<u8>,
    /// File name to present, including any export extension
    pub file_name: String,
    /// MIME type of the bytes (the export type for converted documents)
    pub mime_type: String,
}

/// Port trait for cloud file-storage operations
///
/// Implementations own the HTTP client, timeout and retry policy, and
/// response classification. `parent` arguments of `None` resolve to the
/// configured root folder.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Provider id of the configured root folder
    fn root_id(&self) -> RemoteId;

    /// Lists entities under a parent, optionally filtered by a search term
    ///
    /// Single-page semantics: results past the provider's one-page limit
    /// are not fetched (accepted limitation, no cursor loop).
    async fn list_children(
        &self,
        parent: Option<&RemoteId>,
        search: Option<&str>,
    ) -> Result<Vec<EntityDescriptor>, AdapterError>;

    /// Fetches metadata for one entity
    async fn get_metadata(&self, id: &RemoteId) -> Result<EntityDescriptor, AdapterError>;

    /// Creates a folder under a parent
    async fn create_folder(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
    ) -> Result<EntityDescriptor, AdapterError>;

    /// Uploads file content, choosing the transfer strategy by payload size
    async fn upload(
        &self,
        name: &str,
        parent: Option<&RemoteId>,
        content: Vec<u8>,
        mime_type: &str,
    ) -> Result<EntityDescriptor, AdapterError>;

    /// Downloads entity content, exporting provider-native formats
    async fn download(&self, id: &RemoteId) -> Result<DownloadedContent, AdapterError>;

    /// Permanently deletes one entity (no recursion; use cases own the
    /// worklist)
    async fn delete(&self, id: &RemoteId) -> Result<(), AdapterError>;

    /// Re-parents an entity by replacing its remote parent linkage
    ///
    /// Implementations must read the current parent set first, because the
    /// provider models the move as an atomic add/remove pair.
    async fn move_entity(&self, id: &RemoteId, new_parent: &RemoteId)
        -> Result<(), AdapterError>;

    /// Renames an entity (best-effort)
    async fn rename(&self, id: &RemoteId, new_name: &str) -> Result<SoftOutcome, AdapterError>;

    /// Sets or clears the trashed flag (best-effort)
    async fn set_trashed(&self, id: &RemoteId, trashed: bool)
        -> Result<SoftOutcome, AdapterError>;
}

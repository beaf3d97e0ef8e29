//! Google Drive metadata operations
//!
//! DTOs for the Drive v3 `files` resource plus the metadata operations:
//! listing, lookup, folder creation, deletion, move, and the best-effort
//! rename and trash toggles.
//!
//! Parent linkage on this provider is a list of parent ids on the child;
//! a move is expressed as an atomic `addParents`/`removeParents` pair on
//! a PATCH, which requires reading the current parent set first.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use skybridge_core::domain::errors::{AdapterError, SoftOutcome};
use skybridge_core::domain::newtypes::RemoteId;
use skybridge_core::ports::remote_store::EntityDescriptor;
use skybridge_core::retry::RetryPolicy;

use crate::client::DriveClient;

/// Provider MIME type that marks an entity as a folder
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Field projection requested on every metadata call
pub const FILE_FIELDS: &str =
    "id,name,mimeType,size,parents,trashed,modifiedTime,owners(displayName,emailAddress)";

/// Page size for listing calls (single page, no cursor loop)
const LIST_PAGE_SIZE: u32 = 1000;

// ============================================================================
// DTOs
// ============================================================================

/// One file or folder as reported by the Drive v3 API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// The provider serializes sizes as decimal strings
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub parents: Option<Vec<String>>,
    #[serde(default)]
    pub trashed: bool,
    #[serde(default)]
    pub modified_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub owners: Option<Vec<Owner>>,
}

/// Owner identity attached to a file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

/// Response envelope for a listing call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

impl DriveFile {
    /// Whether the provider reports this entity as a folder
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME)
    }

    /// Maps this DTO into the port-level descriptor
    pub fn into_descriptor(self) -> EntityDescriptor {
        let is_folder = self.is_folder();
        let created_by = self.owners.and_then(|owners| {
            owners
                .into_iter()
                .next()
                .and_then(|o| o.email_address.or(o.display_name))
        });
        EntityDescriptor {
            id: self.id,
            name: self.name,
            mime_type: self.mime_type,
            size: self.size.and_then(|s| s.parse().ok()),
            parent_id: self.parents.and_then(|p| p.into_iter().next()),
            is_folder,
            trashed: self.trashed,
            modified: self.modified_time,
            created_by,
        }
    }
}

// ============================================================================
// Query construction
// ============================================================================

/// Escapes a value for interpolation into a Drive query string
///
/// The query grammar delimits strings with single quotes and uses
/// backslash escapes inside them.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Builds the `q` expression for a listing call
fn listing_query(parent: &RemoteId, search: Option<&str>) -> String {
    let mut q = format!(
        "'{}' in parents and trashed = false",
        escape_query_value(parent.as_str())
    );
    if let Some(term) = search {
        q.push_str(&format!(" and name contains '{}'", escape_query_value(term)));
    }
    q
}

// ============================================================================
// Operations
// ============================================================================

/// Lists entities under a parent, optionally filtered by a search term
///
/// Single-page semantics: one request with the maximum page size, no
/// cursor loop.
pub async fn list_children(
    client: &DriveClient,
    parent: &RemoteId,
    search: Option<&str>,
) -> Result<Vec<EntityDescriptor>, AdapterError> {
    let q = listing_query(parent, search);
    let page_size = LIST_PAGE_SIZE.to_string();
    let fields = format!("files({FILE_FIELDS})");
    let query = [
        ("q", q.as_str()),
        ("pageSize", page_size.as_str()),
        ("fields", fields.as_str()),
    ];

    let response = client
        .execute_with_retry(Method::GET, "/files", &query, None, RetryPolicy::READ)
        .await?;

    let list: FileList = response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;

    debug!(parent = %parent, count = list.files.len(), "Listed children");
    Ok(list
        .files
        .into_iter()
        .map(DriveFile::into_descriptor)
        .collect())
}

/// Fetches metadata for one entity
pub async fn get_metadata(
    client: &DriveClient,
    id: &RemoteId,
) -> Result<EntityDescriptor, AdapterError> {
    let path = format!("/files/{}", id.as_str());
    let query = [("fields", FILE_FIELDS)];

    let response = client
        .execute_with_retry(Method::GET, &path, &query, None, RetryPolicy::READ)
        .await?;

    let file: DriveFile = response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
    Ok(file.into_descriptor())
}

/// Creates a folder under a parent
pub async fn create_folder(
    client: &DriveClient,
    name: &str,
    parent: &RemoteId,
) -> Result<EntityDescriptor, AdapterError> {
    let body = serde_json::json!({
        "name": name,
        "mimeType": FOLDER_MIME,
        "parents": [parent.as_str()],
    });
    let query = [("fields", FILE_FIELDS)];

    let response = client
        .execute_with_retry(
            Method::POST,
            "/files",
            &query,
            Some(&body),
            RetryPolicy::MUTATION,
        )
        .await?;

    let file: DriveFile = response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))?;
    debug!(id = %file.id, name, "Created folder");
    Ok(file.into_descriptor())
}

/// Permanently deletes one entity
///
/// No recursion here; recursive deletion is a worklist owned by the use
/// case layer so partial failures can be reported per child.
pub async fn delete(client: &DriveClient, id: &RemoteId) -> Result<(), AdapterError> {
    let path = format!("/files/{}", id.as_str());
    client
        .execute_with_retry(Method::DELETE, &path, &[], None, RetryPolicy::MUTATION)
        .await?;
    debug!(id = %id, "Deleted entity");
    Ok(())
}

/// Re-parents an entity by replacing its remote parent linkage
///
/// Reads the current parent set first, then issues a single PATCH with
/// `addParents`/`removeParents` so the move is atomic on the provider.
pub async fn move_entity(
    client: &DriveClient,
    id: &RemoteId,
    new_parent: &RemoteId,
) -> Result<(), AdapterError> {
    let current = get_metadata(client, id).await?;
    let path = format!("/files/{}", id.as_str());

    let mut query = vec![
        ("addParents", new_parent.as_str().to_string()),
        ("fields", "id,parents".to_string()),
    ];
    if let Some(old_parent) = current.parent_id {
        query.push(("removeParents", old_parent));
    }
    let query: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let body = serde_json::json!({});
    client
        .execute_with_retry(
            Method::PATCH,
            &path,
            &query,
            Some(&body),
            RetryPolicy::MUTATION,
        )
        .await?;
    debug!(id = %id, new_parent = %new_parent, "Moved entity");
    Ok(())
}

/// Renames an entity (best-effort)
pub async fn rename(
    client: &DriveClient,
    id: &RemoteId,
    new_name: &str,
) -> Result<SoftOutcome, AdapterError> {
    let path = format!("/files/{}", id.as_str());
    let body = serde_json::json!({ "name": new_name });

    match client
        .execute_with_retry(
            Method::PATCH,
            &path,
            &[],
            Some(&body),
            RetryPolicy::MUTATION,
        )
        .await
    {
        Ok(_) => Ok(SoftOutcome::Applied),
        Err(err) => {
            warn!(id = %id, %err, "Rename did not take effect");
            Ok(SoftOutcome::Degraded(err.to_string()))
        }
    }
}

/// Sets or clears the trashed flag (best-effort)
pub async fn set_trashed(
    client: &DriveClient,
    id: &RemoteId,
    trashed: bool,
) -> Result<SoftOutcome, AdapterError> {
    let path = format!("/files/{}", id.as_str());
    let body = serde_json::json!({ "trashed": trashed });

    match client
        .execute_with_retry(
            Method::PATCH,
            &path,
            &[],
            Some(&body),
            RetryPolicy::MUTATION,
        )
        .await
    {
        Ok(_) => Ok(SoftOutcome::Applied),
        Err(err) => {
            warn!(id = %id, trashed, %err, "Trash toggle did not take effect");
            Ok(SoftOutcome::Degraded(err.to_string()))
        }
    }
}

//! SQLite implementation of IMirrorStore
//!
//! ## Type Mapping
//!
//! | Domain Type    | SQL Type | Strategy                                   |
//! |----------------|----------|--------------------------------------------|
//! | LocalId        | TEXT     | UUID string via `to_string()` / `FromStr`  |
//! | RemoteId       | TEXT     | String via `.as_str()` / `RemoteId::new()` |
//! | EntityKind     | TEXT     | `as_str()` / `EntityKind::parse()`         |
//! | DateTime<Utc>  | TEXT     | RFC 3339 via `to_rfc3339()`                |
//! | bool flags     | INTEGER  | 0/1                                        |
//!
//! Deletes are soft: `set_trashed` flips the flag instead of removing
//! the row, so the mirror keeps an audit trail and supports restore.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use skybridge_core::domain::entity::{EntityKind, RemoteEntity};
use skybridge_core::domain::errors::AdapterError;
use skybridge_core::domain::newtypes::{InstanceName, LocalId, RemoteId};
use skybridge_core::ports::mirror_store::IMirrorStore;
use skybridge_core::ports::remote_store::EntityDescriptor;

use crate::MirrorError;

/// SQLite-based implementation of the mirror store port
pub struct SqliteMirrorStore {
    pool: SqlitePool,
}

impl SqliteMirrorStore {
    /// Creates a new store instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, MirrorError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            MirrorError::SerializationError(format!("Failed to parse datetime '{}': {}", s, e))
        })
}

fn entity_from_row(row: &SqliteRow) -> Result<RemoteEntity, MirrorError> {
    let local_id_str: String = row.get("local_id");
    let remote_id_str: String = row.get("remote_id");
    let parent_ref_str: Option<String> = row.get("parent_ref");
    let kind_str: String = row.get("kind");
    let name: String = row.get("name");
    let is_trashed: i64 = row.get("is_trashed");
    let is_local_only: i64 = row.get("is_local_only");
    let is_inconsistent: i64 = row.get("is_inconsistent");
    let size: Option<i64> = row.get("size");
    let mime_type: Option<String> = row.get("mime_type");
    let created_by: Option<String> = row.get("created_by");
    let created_at_str: String = row.get("created_at");
    let modified_at_str: String = row.get("modified_at");

    let local_id: LocalId = local_id_str
        .parse()
        .map_err(|e| MirrorError::SerializationError(format!("local_id: {e}")))?;
    let remote_id: RemoteId = remote_id_str
        .parse()
        .map_err(|e| MirrorError::SerializationError(format!("remote_id: {e}")))?;
    let parent_ref = match parent_ref_str {
        Some(s) => Some(
            s.parse::<LocalId>()
                .map_err(|e| MirrorError::SerializationError(format!("parent_ref: {e}")))?,
        ),
        None => None,
    };
    let kind = EntityKind::parse(&kind_str)
        .map_err(|e| MirrorError::SerializationError(e.to_string()))?;

    Ok(RemoteEntity {
        local_id,
        remote_id,
        parent_ref,
        kind,
        name,
        is_trashed: is_trashed != 0,
        is_local_only: is_local_only != 0,
        is_inconsistent: is_inconsistent != 0,
        size: size.map(|s| s as u64),
        mime_type,
        created_by,
        created_at: parse_datetime(&created_at_str)?,
        modified_at: parse_datetime(&modified_at_str)?,
    })
}

// ============================================================================
// Queries
// ============================================================================

const SELECT_COLUMNS: &str = "local_id, remote_id, parent_ref, kind, name, is_trashed, \
     is_local_only, is_inconsistent, size, mime_type, created_by, created_at, modified_at";

impl SqliteMirrorStore {
    async fn insert_entity(&self, entity: &RemoteEntity) -> Result<(), MirrorError> {
        sqlx::query(
            "INSERT INTO entities (local_id, remote_id, parent_ref, kind, name, is_trashed, \
             is_local_only, is_inconsistent, size, mime_type, created_by, created_at, modified_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.local_id.to_string())
        .bind(entity.remote_id.as_str())
        .bind(entity.parent_ref.map(|p| p.to_string()))
        .bind(entity.kind.as_str())
        .bind(&entity.name)
        .bind(entity.is_trashed as i64)
        .bind(entity.is_local_only as i64)
        .bind(entity.is_inconsistent as i64)
        .bind(entity.size.map(|s| s as i64))
        .bind(&entity.mime_type)
        .bind(&entity.created_by)
        .bind(entity.created_at.to_rfc3339())
        .bind(entity.modified_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_remote_id_inner(
        &self,
        remote_id: &str,
    ) -> Result<Option<RemoteEntity>, MirrorError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM entities WHERE remote_id = ?");
        let row = sqlx::query(&sql)
            .bind(remote_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(entity_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl IMirrorStore for SqliteMirrorStore {
    async fn upsert_remote(
        &self,
        descriptor: &EntityDescriptor,
        parent_ref: Option<LocalId>,
    ) -> Result<RemoteEntity, AdapterError> {
        if let Some(mut existing) = self.find_by_remote_id_inner(&descriptor.id).await? {
            existing.name = descriptor.name.clone();
            existing.parent_ref = parent_ref;
            existing.is_trashed = descriptor.trashed;
            // A fresh descriptor reconciles the row: it exists remotely
            // and its parent chain was just resolved
            existing.is_local_only = false;
            existing.is_inconsistent = false;
            existing.size = descriptor.size;
            existing.mime_type = descriptor.mime_type.clone();
            existing.created_by = descriptor.created_by.clone();
            existing.modified_at = Utc::now();

            sqlx::query(
                "UPDATE entities SET name = ?, parent_ref = ?, is_trashed = ?, \
                 is_local_only = 0, is_inconsistent = 0, size = ?, \
                 mime_type = ?, created_by = ?, modified_at = ? WHERE remote_id = ?",
            )
            .bind(&existing.name)
            .bind(existing.parent_ref.map(|p| p.to_string()))
            .bind(existing.is_trashed as i64)
            .bind(existing.size.map(|s| s as i64))
            .bind(&existing.mime_type)
            .bind(&existing.created_by)
            .bind(existing.modified_at.to_rfc3339())
            .bind(existing.remote_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(MirrorError::from)?;

            debug!(remote_id = %existing.remote_id, "Updated mirror row");
            return Ok(existing);
        }

        let remote_id: RemoteId = descriptor
            .id
            .parse()
            .map_err(|e| AdapterError::Mirror(format!("descriptor id: {e}")))?;
        let kind = if descriptor.is_folder {
            EntityKind::Folder
        } else {
            EntityKind::File
        };
        let mut entity =
            RemoteEntity::from_remote(remote_id, descriptor.name.clone(), kind, parent_ref);
        entity.is_trashed = descriptor.trashed;
        entity.size = descriptor.size;
        entity.mime_type = descriptor.mime_type.clone();
        entity.created_by = descriptor.created_by.clone();

        self.insert_entity(&entity).await?;
        debug!(remote_id = %entity.remote_id, "Inserted mirror row");
        Ok(entity)
    }

    async fn insert_local_only(
        &self,
        name: &str,
        kind: EntityKind,
        parent_ref: Option<LocalId>,
    ) -> Result<RemoteEntity, AdapterError> {
        let entity = RemoteEntity::local_only(name.to_string(), kind, parent_ref);
        self.insert_entity(&entity).await?;
        debug!(remote_id = %entity.remote_id, name, "Inserted local-only fallback row");
        Ok(entity)
    }

    async fn upsert_instance(&self, name: &InstanceName) -> Result<RemoteEntity, AdapterError> {
        // Instances are keyed by their name; the gateway has no separate id
        if let Some(mut existing) = self.find_by_remote_id_inner(name.as_str()).await? {
            existing.modified_at = Utc::now();
            sqlx::query("UPDATE entities SET modified_at = ? WHERE remote_id = ?")
                .bind(existing.modified_at.to_rfc3339())
                .bind(existing.remote_id.as_str())
                .execute(&self.pool)
                .await
                .map_err(MirrorError::from)?;
            return Ok(existing);
        }

        let remote_id: RemoteId = name
            .as_str()
            .parse()
            .map_err(|e| AdapterError::Mirror(format!("instance name: {e}")))?;
        let entity = RemoteEntity::from_remote(
            remote_id,
            name.as_str().to_string(),
            EntityKind::MessagingInstance,
            None,
        );
        self.insert_entity(&entity).await?;
        debug!(instance = %name, "Inserted mirror row for messaging instance");
        Ok(entity)
    }

    async fn find_by_remote_id(
        &self,
        remote_id: &RemoteId,
    ) -> Result<Option<RemoteEntity>, AdapterError> {
        Ok(self.find_by_remote_id_inner(remote_id.as_str()).await?)
    }

    async fn find_by_local_id(&self, id: &LocalId) -> Result<Option<RemoteEntity>, AdapterError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM entities WHERE local_id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(MirrorError::from)?;
        Ok(row
            .as_ref()
            .map(entity_from_row)
            .transpose()
            .map_err(AdapterError::from)?)
    }

    async fn children_of(
        &self,
        parent_ref: Option<&LocalId>,
    ) -> Result<Vec<RemoteEntity>, AdapterError> {
        let rows = match parent_ref {
            Some(parent) => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM entities WHERE parent_ref = ? \
                     AND is_trashed = 0 AND is_inconsistent = 0 ORDER BY name"
                );
                sqlx::query(&sql)
                    .bind(parent.to_string())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM entities WHERE parent_ref IS NULL \
                     AND is_trashed = 0 AND is_inconsistent = 0 ORDER BY name"
                );
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(MirrorError::from)?;

        rows.iter()
            .map(|row| entity_from_row(row).map_err(AdapterError::from))
            .collect()
    }

    async fn set_trashed(&self, remote_id: &RemoteId, trashed: bool) -> Result<(), AdapterError> {
        sqlx::query(
            "UPDATE entities SET is_trashed = ?, modified_at = ? WHERE remote_id = ?",
        )
        .bind(trashed as i64)
        .bind(Utc::now().to_rfc3339())
        .bind(remote_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(MirrorError::from)?;
        Ok(())
    }

    async fn set_parent(
        &self,
        remote_id: &RemoteId,
        parent_ref: Option<LocalId>,
    ) -> Result<(), AdapterError> {
        sqlx::query(
            "UPDATE entities SET parent_ref = ?, modified_at = ? WHERE remote_id = ?",
        )
        .bind(parent_ref.map(|p| p.to_string()))
        .bind(Utc::now().to_rfc3339())
        .bind(remote_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(MirrorError::from)?;
        Ok(())
    }

    async fn mark_inconsistent(
        &self,
        remote_id: &RemoteId,
        inconsistent: bool,
    ) -> Result<(), AdapterError> {
        sqlx::query(
            "UPDATE entities SET is_inconsistent = ?, modified_at = ? WHERE remote_id = ?",
        )
        .bind(inconsistent as i64)
        .bind(Utc::now().to_rfc3339())
        .bind(remote_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(MirrorError::from)?;
        Ok(())
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>, AdapterError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(MirrorError::from)?;
        Ok(row.map(|r| r.get("value")))
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), AdapterError> {
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
             updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(MirrorError::from)?;
        Ok(())
    }
}

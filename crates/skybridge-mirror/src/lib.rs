//! SkyBridge Mirror - local mirror of remote entity metadata
//!
//! SQLite-backed store for:
//! - RemoteEntity rows (files, folders, messaging instances)
//! - A key-value settings store (last-known connection status)
//!
//! ## Architecture
//!
//! This crate implements the `IMirrorStore` port from `skybridge-core`
//! using SQLite as the storage backend. It is a driven (secondary)
//! adapter in the hexagonal architecture. Deletes are soft: rows are
//! flagged trashed rather than removed, preserving an audit trail and
//! enabling restore.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteMirrorStore`] - Full `IMirrorStore` implementation
//! - [`MirrorError`] - Error types for mirror operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use skybridge_mirror::{DatabasePool, SqliteMirrorStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/var/lib/skybridge/mirror.db")).await?;
//! let store = SqliteMirrorStore::new(pool.pool().clone());
//! // Use store as IMirrorStore...
//! # Ok(())
//! # }
//! ```

pub mod pool;
pub mod store;

pub use pool::DatabasePool;
pub use store::SqliteMirrorStore;

use skybridge_core::domain::errors::AdapterError;

/// Errors that can occur during mirror operations
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Deserialization of a stored domain value failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for MirrorError {
    fn from(e: sqlx::Error) -> Self {
        MirrorError::QueryFailed(e.to_string())
    }
}

impl From<MirrorError> for AdapterError {
    fn from(e: MirrorError) -> Self {
        AdapterError::Mirror(e.to_string())
    }
}

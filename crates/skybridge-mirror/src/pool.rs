//! SQLite connection handling for the mirror database
//!
//! One pool per database file, WAL-journaled so status reads never block
//! behind reconciliation writes. The schema ships embedded and is applied
//! on every open; statements are idempotent so reopening an existing
//! database is a no-op.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use crate::MirrorError;

const MAX_FILE_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the SQLite connection pool backing [`SqliteMirrorStore`]
///
/// [`SqliteMirrorStore`]: crate::SqliteMirrorStore
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Opens (creating if needed) the mirror database at the given path
    ///
    /// Parent directories are created first, so a fresh install can point
    /// at a path under its data directory without preparing it.
    ///
    /// # Errors
    ///
    /// [`MirrorError::ConnectionFailed`] when the file cannot be opened,
    /// [`MirrorError::MigrationFailed`] when applying the schema fails.
    pub async fn new(db_path: &Path) -> Result<Self, MirrorError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MirrorError::ConnectionFailed(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL is durable enough under WAL for a rebuildable mirror
            .synchronous(SqliteSynchronous::Normal)
            // parent_ref is a soft reference: rows may outlive their
            // parent (flagged inconsistent) until reconciliation repairs
            // the chain, so SQLite must not enforce it
            .foreign_keys(false)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = Self::open(options, MAX_FILE_CONNECTIONS).await.map_err(|e| {
            MirrorError::ConnectionFailed(format!("cannot open {}: {}", db_path.display(), e))
        })?;
        Self::apply_schema(&pool).await?;

        tracing::info!(path = %db_path.display(), "Mirror database opened");
        Ok(Self { pool })
    }

    /// Opens a private in-memory database
    ///
    /// Capped at one connection: an in-memory SQLite database lives and
    /// dies with its connection, so a second one would see empty tables.
    pub async fn in_memory() -> Result<Self, MirrorError> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = Self::open(options, 1)
            .await
            .map_err(|e| MirrorError::ConnectionFailed(format!("in-memory database: {e}")))?;
        Self::apply_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn open(options: SqliteConnectOptions, max: u32) -> Result<SqlitePool, sqlx::Error> {
        SqlitePoolOptions::new()
            .max_connections(max)
            .connect_with(options)
            .await
    }

    async fn apply_schema(pool: &SqlitePool) -> Result<(), MirrorError> {
        sqlx::raw_sql(include_str!("migrations/20260815_initial.sql"))
            .execute(pool)
            .await
            .map_err(|e| MirrorError::MigrationFailed(e.to_string()))?;
        Ok(())
    }
}

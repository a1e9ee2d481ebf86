//! Versioned schema migrations, applied in order at engine startup.

mod v001_initial;

use rusqlite::Connection;

use quarry_core::errors::{QuarryError, QuarryResult, StorageError};

/// All migrations in version order.
const MIGRATIONS: &[(u32, fn(&Connection) -> QuarryResult<()>)] = &[(1, v001_initial::apply)];

/// Run every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> QuarryResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
    )
    .map_err(|e| crate::to_storage_err(e.to_string()))?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| crate::to_storage_err(e.to_string()))?;

    for (version, apply) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        apply(conn).map_err(|e| {
            QuarryError::Storage(StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![version, chrono::Utc::now().to_rfc3339()],
        )
        .map_err(|e| crate::to_storage_err(e.to_string()))?;
        tracing::debug!(version, "applied migration");
    }

    Ok(())
}

//! Initial schema: documents, chunks, embedding tasks.
//!
//! The partial unique index on active tasks is what makes "at most one
//! active task per document" race-free: concurrent creators both insert,
//! one hits the constraint.

use rusqlite::Connection;

use quarry_core::errors::QuarryResult;

use crate::to_storage_err;

pub fn apply(conn: &Connection) -> QuarryResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            size_bytes INTEGER NOT NULL DEFAULT 0,
            uploaded_at TEXT NOT NULL,
            status TEXT NOT NULL,
            preview TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS chunks (
            id TEXT PRIMARY KEY,
            document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            chunk_index INTEGER NOT NULL,
            chunk_type TEXT NOT NULL,
            content TEXT NOT NULL,
            token_count INTEGER NOT NULL DEFAULT 0,
            parent_id TEXT,
            embedding BLOB,
            embedding_dims INTEGER,
            UNIQUE (document_id, chunk_index)
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_document
            ON chunks (document_id, chunk_index);

        CREATE TABLE IF NOT EXISTS embedding_tasks (
            id TEXT PRIMARY KEY,
            document_id TEXT NOT NULL,
            status TEXT NOT NULL,
            processed_count INTEGER NOT NULL DEFAULT 0,
            total_count INTEGER NOT NULL DEFAULT 0,
            progress REAL NOT NULL DEFAULT 0,
            error TEXT,
            success_count INTEGER NOT NULL DEFAULT 0,
            fail_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_document
            ON embedding_tasks (document_id, created_at);

        CREATE UNIQUE INDEX IF NOT EXISTS idx_tasks_one_active_per_document
            ON embedding_tasks (document_id)
            WHERE status IN ('pending', 'processing');
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

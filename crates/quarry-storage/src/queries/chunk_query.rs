//! Chunk set loads for search and the embedding worker.

use rusqlite::{params, Connection};

use quarry_core::errors::QuarryResult;
use quarry_core::models::Chunk;

use crate::to_storage_err;

use super::chunk_crud::{parse_chunk_row, CHUNK_SELECT};

/// All chunks of one document, ordered by `chunk_index`.
pub fn chunks_for_document(conn: &Connection, document_id: &str) -> QuarryResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(&format!(
            "{CHUNK_SELECT} WHERE document_id = ?1 ORDER BY chunk_index"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![document_id], parse_chunk_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    collect_chunks(rows)
}

/// The full candidate set, ordered by document then index.
pub fn all_chunks(conn: &Connection) -> QuarryResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(&format!("{CHUNK_SELECT} ORDER BY document_id, chunk_index"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], parse_chunk_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    collect_chunks(rows)
}

/// `Child`/`Window` chunks of a document still lacking an embedding.
pub fn chunks_missing_embeddings(
    conn: &Connection,
    document_id: &str,
) -> QuarryResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(&format!(
            "{CHUNK_SELECT} WHERE document_id = ?1
               AND chunk_type != 'parent'
               AND embedding IS NULL
             ORDER BY chunk_index"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![document_id], parse_chunk_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    collect_chunks(rows)
}

/// Document ids with at least one chunk lacking a required embedding.
/// Drives the startup recovery scan.
pub fn documents_missing_embeddings(conn: &Connection) -> QuarryResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT document_id FROM chunks
             WHERE chunk_type != 'parent' AND embedding IS NULL
             ORDER BY document_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(ids)
}

fn collect_chunks<'a>(
    rows: impl Iterator<Item = rusqlite::Result<QuarryResult<Chunk>>> + 'a,
) -> QuarryResult<Vec<Chunk>> {
    let mut chunks = Vec::new();
    for row in rows {
        chunks.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(chunks)
}

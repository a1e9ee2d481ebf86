//! Bulk chunk insertion and single-chunk lookup.

use rusqlite::{params, Connection, Row};

use quarry_core::constants::MAX_BULK_BATCH_SIZE;
use quarry_core::errors::QuarryResult;
use quarry_core::models::{Chunk, ChunkType};

use crate::to_storage_err;

use super::embedding_ops::{bytes_to_f32_vec, f32_vec_to_bytes};

/// Bulk insert chunks in one transaction per batch. Returns the number
/// inserted. Chunks are immutable after this point except for the
/// embedding columns.
pub fn insert_chunks(conn: &Connection, chunks: &[Chunk]) -> QuarryResult<usize> {
    let mut inserted = 0usize;
    for batch in chunks.chunks(MAX_BULK_BATCH_SIZE) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("insert_chunks begin: {e}")))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO chunks (
                        id, document_id, chunk_index, chunk_type, content,
                        token_count, parent_id, embedding, embedding_dims
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )
                .map_err(|e| to_storage_err(e.to_string()))?;

            for chunk in batch {
                let blob = chunk.embedding.as_ref().map(|v| f32_vec_to_bytes(v));
                let dims = chunk.embedding.as_ref().map(|v| v.len() as i64);
                stmt.execute(params![
                    chunk.id,
                    chunk.document_id,
                    chunk.chunk_index,
                    chunk.chunk_type.as_str(),
                    chunk.content,
                    chunk.token_count as i64,
                    chunk.parent_id,
                    blob,
                    dims,
                ])
                .map_err(|e| to_storage_err(e.to_string()))?;
                inserted += 1;
            }
        }

        tx.commit()
            .map_err(|e| to_storage_err(format!("insert_chunks commit: {e}")))?;
    }
    Ok(inserted)
}

pub fn get_chunk(conn: &Connection, id: &str) -> QuarryResult<Option<Chunk>> {
    let mut stmt = conn
        .prepare(&format!("{CHUNK_SELECT} WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut rows = stmt
        .query_map(params![id], parse_chunk_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    match rows.next() {
        Some(row) => Ok(Some(row.map_err(|e| to_storage_err(e.to_string()))??)),
        None => Ok(None),
    }
}

pub(super) const CHUNK_SELECT: &str = "SELECT id, document_id, chunk_index, chunk_type, \
     content, token_count, parent_id, embedding, embedding_dims FROM chunks";

pub(super) fn parse_chunk_row(row: &Row<'_>) -> rusqlite::Result<QuarryResult<Chunk>> {
    let id: String = row.get(0)?;
    let document_id: String = row.get(1)?;
    let chunk_index: u32 = row.get(2)?;
    let chunk_type: String = row.get(3)?;
    let content: String = row.get(4)?;
    let token_count: usize = row.get::<_, i64>(5)? as usize;
    let parent_id: Option<String> = row.get(6)?;
    let blob: Option<Vec<u8>> = row.get(7)?;
    let dims: Option<i64> = row.get(8)?;

    Ok((|| {
        let chunk_type = ChunkType::parse(&chunk_type)
            .ok_or_else(|| to_storage_err(format!("unknown chunk type: {chunk_type}")))?;
        let embedding = match (blob, dims) {
            (Some(bytes), Some(dims)) => Some(bytes_to_f32_vec(&bytes, dims as usize)),
            _ => None,
        };
        Ok(Chunk {
            id,
            document_id,
            chunk_index,
            chunk_type,
            content,
            token_count,
            parent_id,
            embedding,
        })
    })())
}

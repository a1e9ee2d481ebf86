//! Batched embedding writes.
//!
//! The embedding worker persists one transaction per batch, touching
//! only the embedding columns. Chunk content and structure are never
//! modified here.

use rusqlite::{params, Connection};

use quarry_core::errors::QuarryResult;

use crate::to_storage_err;

/// Write a batch of embeddings in a single transaction. Returns the
/// number of rows updated (unknown chunk ids are skipped silently; the
/// worker logs them).
pub fn write_embeddings(
    conn: &Connection,
    updates: &[(String, Vec<f32>)],
) -> QuarryResult<usize> {
    if updates.is_empty() {
        return Ok(0);
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("write_embeddings begin: {e}")))?;

    let mut updated = 0usize;
    {
        let mut stmt = tx
            .prepare(
                "UPDATE chunks SET embedding = ?2, embedding_dims = ?3 WHERE id = ?1",
            )
            .map_err(|e| to_storage_err(e.to_string()))?;

        for (chunk_id, embedding) in updates {
            let blob = f32_vec_to_bytes(embedding);
            let n = stmt
                .execute(params![chunk_id, blob, embedding.len() as i64])
                .map_err(|e| to_storage_err(e.to_string()))?;
            updated += n;
        }
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("write_embeddings commit: {e}")))?;
    Ok(updated)
}

/// Convert f32 slice to bytes (little-endian).
pub(super) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to f32 vec.
pub(super) fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Vec<f32> {
    let mut result = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_bytes_roundtrip() {
        let v = vec![0.25f32, -1.5, 3.75];
        let bytes = f32_vec_to_bytes(&v);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes_to_f32_vec(&bytes, 3), v);
    }
}

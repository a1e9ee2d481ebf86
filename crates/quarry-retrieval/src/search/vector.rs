//! Vector scoring over chunk embeddings.
//!
//! Brute-force cosine similarity over the candidate set — O(chunks) per
//! query with no ANN structure. That is a scaling ceiling, acceptable at
//! the corpus sizes this engine targets, and should be revisited before
//! the chunk count grows by orders of magnitude.

use quarry_core::models::Chunk;

/// A chunk scored by the vector pass.
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub chunk_id: String,
    pub similarity: f64,
}

/// Score candidate chunks by cosine similarity to the query embedding.
///
/// Parent chunks, chunks without embeddings, and dimension mismatches
/// are skipped. `min_score` filters low-similarity chunks before
/// ranking. Output sorted descending, ties by chunk id.
pub fn score_chunks(query_embedding: &[f32], chunks: &[Chunk], min_score: f64) -> Vec<VectorHit> {
    // Pre-compute the query norm once for early-exit on zero-norm queries.
    let query_norm_sq: f64 = query_embedding
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum();
    if query_norm_sq == 0.0 {
        return Vec::new();
    }
    let query_len = query_embedding.len();

    let mut hits: Vec<VectorHit> = chunks
        .iter()
        .filter(|chunk| chunk.requires_embedding())
        .filter_map(|chunk| {
            let embedding = chunk.embedding.as_ref()?;
            // Skip dimension mismatches rather than erroring the query.
            if embedding.len() != query_len {
                return None;
            }
            let similarity = cosine_similarity(query_embedding, embedding);
            (similarity >= min_score).then(|| VectorHit {
                chunk_id: chunk.id.clone(),
                similarity,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    hits
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    let norm_b: f64 = b
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

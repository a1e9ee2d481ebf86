//! Hybrid search: concurrent keyword ‖ vector scoring joined by RRF.

pub mod keyword;
pub mod rrf_fusion;
pub mod vector;

pub use keyword::KeywordHit;
pub use rrf_fusion::{fuse, FusedChunk, FusionWeights};
pub use vector::VectorHit;

use quarry_core::config::SearchConfig;
use quarry_core::models::Chunk;

/// Run the keyword and vector passes concurrently and join before
/// fusion. The two scans are independent CPU-bound work over the same
/// candidate set.
pub fn hybrid_scan(
    query: &str,
    query_embedding: Option<&[f32]>,
    chunks: &[Chunk],
    min_score: f64,
    config: &SearchConfig,
) -> (Vec<KeywordHit>, Vec<VectorHit>) {
    rayon::join(
        || keyword::score_chunks(query, chunks, config),
        || match query_embedding {
            Some(embedding) => vector::score_chunks(embedding, chunks, min_score),
            None => Vec::new(),
        },
    )
}

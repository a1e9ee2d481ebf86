//! Reciprocal Rank Fusion: score = Σ weight / (k + rank + 1)
//!
//! Combines the keyword and vector ranked lists into a single fused
//! ranking without requiring score normalization across the two
//! retrieval methods. `k` and the per-list weights are dynamic, derived
//! from the classified intent: lexical-leaning intents use a lower `k`
//! and boost keyword contributions, semantic-leaning intents the
//! opposite.

use std::collections::HashMap;

use quarry_core::config::SearchConfig;
use quarry_core::models::SearchSource;
use quarry_core::Intent;

use super::keyword::KeywordHit;
use super::vector::VectorHit;

/// A candidate after RRF fusion, annotated with the list(s) that
/// contributed it.
#[derive(Debug, Clone)]
pub struct FusedChunk {
    pub chunk_id: String,
    /// Fused RRF score (higher = more relevant).
    pub score: f64,
    pub sources: Vec<SearchSource>,
}

/// Fusion parameters derived from the classified intent.
#[derive(Debug, Clone, Copy)]
pub struct FusionWeights {
    /// Smoothing constant. Higher k reduces the influence of
    /// high-ranking items from any single list.
    pub k: f64,
    pub keyword_weight: f64,
    pub vector_weight: f64,
}

impl FusionWeights {
    /// Derive fusion parameters for an intent.
    pub fn for_intent(intent: Intent, config: &SearchConfig) -> Self {
        if intent.is_lexical() {
            Self {
                k: config.rrf_k_lexical,
                keyword_weight: config.fusion_weight_boost,
                vector_weight: 1.0,
            }
        } else {
            Self {
                k: config.rrf_k_semantic,
                keyword_weight: 1.0,
                vector_weight: config.fusion_weight_boost,
            }
        }
    }
}

/// Fuse the two ranked lists. Each list is truncated to `prefix` before
/// fusion to bound cost; a chunk appearing in both lists accumulates
/// both contributions. Output sorted descending, ties by chunk id.
pub fn fuse(
    keyword: &[KeywordHit],
    vector: &[VectorHit],
    weights: FusionWeights,
    prefix: usize,
) -> Vec<FusedChunk> {
    let mut scores: HashMap<String, f64> = HashMap::new();
    let mut sources: HashMap<String, Vec<SearchSource>> = HashMap::new();

    for (rank, hit) in keyword.iter().take(prefix).enumerate() {
        let rrf = weights.keyword_weight / (weights.k + rank as f64 + 1.0);
        *scores.entry(hit.chunk_id.clone()).or_default() += rrf;
        sources
            .entry(hit.chunk_id.clone())
            .or_default()
            .push(SearchSource::Keyword);
    }

    for (rank, hit) in vector.iter().take(prefix).enumerate() {
        let rrf = weights.vector_weight / (weights.k + rank as f64 + 1.0);
        *scores.entry(hit.chunk_id.clone()).or_default() += rrf;
        sources
            .entry(hit.chunk_id.clone())
            .or_default()
            .push(SearchSource::Vector);
    }

    let mut fused: Vec<FusedChunk> = scores
        .into_iter()
        .map(|(chunk_id, score)| {
            let sources = sources.remove(&chunk_id).unwrap_or_default();
            FusedChunk {
                chunk_id,
                score,
                sources,
            }
        })
        .collect();

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(id: &str, score: f64) -> KeywordHit {
        KeywordHit {
            chunk_id: id.to_string(),
            score,
        }
    }

    fn vec_hit(id: &str, similarity: f64) -> VectorHit {
        VectorHit {
            chunk_id: id.to_string(),
            similarity,
        }
    }

    fn neutral() -> FusionWeights {
        FusionWeights {
            k: 60.0,
            keyword_weight: 1.0,
            vector_weight: 1.0,
        }
    }

    #[test]
    fn chunk_in_both_lists_accumulates() {
        let keyword = vec![kw("a", 5.0), kw("b", 3.0)];
        let vector = vec![vec_hit("a", 0.9)];
        let fused = fuse(&keyword, &vector, neutral(), 60);

        assert_eq!(fused[0].chunk_id, "a");
        let expected = 1.0 / 61.0 + 1.0 / 61.0;
        assert!((fused[0].score - expected).abs() < 1e-12);
        assert_eq!(
            fused[0].sources,
            vec![SearchSource::Keyword, SearchSource::Vector]
        );
        assert_eq!(fused[1].sources, vec![SearchSource::Keyword]);
    }

    #[test]
    fn contribution_decreases_with_rank() {
        let keyword = vec![kw("a", 5.0), kw("b", 4.0), kw("c", 3.0)];
        let fused = fuse(&keyword, &[], neutral(), 60);
        assert!(fused[0].score > fused[1].score);
        assert!(fused[1].score > fused[2].score);
    }

    #[test]
    fn prefix_bounds_fusion() {
        let keyword: Vec<KeywordHit> = (0..100).map(|i| kw(&format!("k{i:03}"), 1.0)).collect();
        let fused = fuse(&keyword, &[], neutral(), 10);
        assert_eq!(fused.len(), 10);
    }

    #[test]
    fn lexical_intents_boost_keyword_contributions() {
        let config = SearchConfig::default();
        let lexical = FusionWeights::for_intent(Intent::Command, &config);
        let semantic = FusionWeights::for_intent(Intent::Explanation, &config);

        assert!(lexical.keyword_weight > lexical.vector_weight);
        assert!(semantic.vector_weight > semantic.keyword_weight);
        assert!(lexical.k < semantic.k);
    }

    #[test]
    fn deterministic_tie_break_by_id() {
        // Same rank contribution from different lists.
        let keyword = vec![kw("b", 1.0)];
        let vector = vec![vec_hit("a", 0.5)];
        let fused = fuse(&keyword, &vector, neutral(), 60);
        assert_eq!(fused[0].chunk_id, "a");
        assert_eq!(fused[1].chunk_id, "b");
    }
}

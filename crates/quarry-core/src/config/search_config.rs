use serde::{Deserialize, Serialize};

use super::defaults;

/// Hybrid search, fusion, filtering, and reranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Bonus for an exact full-query substring match.
    pub exact_match_bonus: f64,
    /// Points per matched query token.
    pub token_match_points: f64,
    /// Prefix of each ranked list considered by RRF fusion.
    pub fusion_prefix: usize,
    /// RRF smoothing constant for lexical-leaning intents.
    pub rrf_k_lexical: f64,
    /// RRF smoothing constant for semantic-leaning intents.
    pub rrf_k_semantic: f64,
    /// Multiplier on the favored list's contributions (~1.2).
    pub fusion_weight_boost: f64,
    /// Document filter ratio against the best document's mean score.
    pub document_ratio: f64,
    /// Keyword score that bypasses the ratio test.
    pub keyword_bypass_floor: f64,
    /// Documents included in the single batched rerank call.
    pub rerank_max_documents: usize,
    /// Candidate chunks per document offered to the reranker.
    pub rerank_per_document: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exact_match_bonus: defaults::EXACT_MATCH_BONUS,
            token_match_points: defaults::TOKEN_MATCH_POINTS,
            fusion_prefix: defaults::FUSION_PREFIX,
            rrf_k_lexical: defaults::RRF_K_LEXICAL,
            rrf_k_semantic: defaults::RRF_K_SEMANTIC,
            fusion_weight_boost: defaults::FUSION_WEIGHT_BOOST,
            document_ratio: defaults::DOCUMENT_RATIO,
            keyword_bypass_floor: defaults::KEYWORD_BYPASS_FLOOR,
            rerank_max_documents: defaults::RERANK_MAX_DOCUMENTS,
            rerank_per_document: defaults::RERANK_PER_DOCUMENT,
        }
    }
}

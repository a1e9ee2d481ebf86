//! Intent → search parameter mapping.
//!
//! Default tuples are hardcoded; any subset can be overridden via a map
//! keyed by intent name (loaded from TOML config). Recall-oriented
//! intents widen the limit and lower the similarity floor; precision
//! intents do the opposite.

use std::collections::HashMap;

use quarry_core::{Intent, SearchParams};

/// Default parameter tuple for an intent.
pub fn default_params(intent: Intent) -> SearchParams {
    match intent {
        // Wide recall: symptoms are phrased many ways.
        Intent::Troubleshoot => SearchParams {
            limit: 15,
            rerank_candidates: 20,
            min_score: 0.30,
        },
        // Precision: concept answers live in few, dense passages.
        Intent::Explanation => SearchParams {
            limit: 6,
            rerank_candidates: 10,
            min_score: 0.50,
        },
        Intent::Command => SearchParams {
            limit: 8,
            rerank_candidates: 10,
            min_score: 0.45,
        },
        Intent::Configuration => SearchParams {
            limit: 12,
            rerank_candidates: 15,
            min_score: 0.35,
        },
        Intent::Performance => SearchParams {
            limit: 12,
            rerank_candidates: 15,
            min_score: 0.35,
        },
        Intent::Comparison => SearchParams {
            limit: 10,
            rerank_candidates: 12,
            min_score: 0.40,
        },
        Intent::BestPractice => SearchParams {
            limit: 10,
            rerank_candidates: 12,
            min_score: 0.40,
        },
        Intent::Verification => SearchParams {
            limit: 8,
            rerank_candidates: 10,
            min_score: 0.40,
        },
        Intent::Question | Intent::General => SearchParams {
            limit: 10,
            rerank_candidates: 12,
            min_score: 0.40,
        },
    }
}

/// Parse overrides keyed by intent name. Unknown names are ignored.
pub fn load_param_overrides(
    overrides: &HashMap<String, SearchParams>,
) -> HashMap<Intent, SearchParams> {
    overrides
        .iter()
        .filter_map(|(name, params)| Intent::parse(name).map(|intent| (intent, *params)))
        .collect()
}

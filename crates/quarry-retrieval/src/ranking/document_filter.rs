//! Document-level relevance filter.
//!
//! Aggregates chunk-level fused scores per source document and drops
//! documents under an adaptive threshold relative to the best document.
//! A single ratio test over-penalizes documents whose content is correct
//! but lexically sparse next to a dominant document, so a document
//! passes on any of three conditions:
//!
//! 1. mean fused score ≥ `max_avg × ratio`
//! 2. strong direct keyword match (keyword score ≥ a fixed floor)
//! 3. some keyword presence and mean ≥ half the ratio threshold

use std::collections::HashMap;

use tracing::debug;

use quarry_core::config::SearchConfig;

use crate::search::FusedChunk;

/// Restrict the fused list to chunks of passing documents, preserving
/// fused-score order. An empty result means "no relevant documents";
/// there is no fallback to an unrelated document.
pub fn filter_by_document(
    fused: &[FusedChunk],
    doc_of: &HashMap<String, String>,
    keyword_scores: &HashMap<String, f64>,
    config: &SearchConfig,
) -> Vec<FusedChunk> {
    if fused.is_empty() {
        return Vec::new();
    }

    // Mean fused score per document.
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for chunk in fused {
        if let Some(doc) = doc_of.get(&chunk.chunk_id) {
            let entry = sums.entry(doc.as_str()).or_insert((0.0, 0));
            entry.0 += chunk.score;
            entry.1 += 1;
        }
    }

    let means: HashMap<&str, f64> = sums
        .into_iter()
        .map(|(doc, (sum, count))| (doc, sum / count as f64))
        .collect();

    let max_avg = means.values().fold(0.0f64, |a, &b| a.max(b));
    let threshold = max_avg * config.document_ratio;

    let passing: HashMap<&str, bool> = means
        .iter()
        .map(|(doc, &mean)| {
            let keyword = keyword_scores.get(*doc).copied().unwrap_or(0.0);
            let passes = mean >= threshold
                || keyword >= config.keyword_bypass_floor
                || (keyword > 0.0 && mean >= threshold / 2.0);
            (*doc, passes)
        })
        .collect();

    let kept: Vec<FusedChunk> = fused
        .iter()
        .filter(|chunk| {
            doc_of
                .get(&chunk.chunk_id)
                .is_some_and(|doc| passing.get(doc.as_str()).copied().unwrap_or(false))
        })
        .cloned()
        .collect();

    debug!(
        documents = means.len(),
        passing = passing.values().filter(|p| **p).count(),
        threshold,
        "document relevance filter"
    );
    kept
}

//! Batched reranker adapter.
//!
//! Flattens the capped candidates from all selected documents into one
//! ordered content list, issues a single external rerank call, and
//! scatters the returned scores back to their chunks. Batching into one
//! call amortizes network latency that would otherwise be paid once per
//! document. Provider failure degrades gracefully: the input order is
//! returned unchanged.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use quarry_core::config::SearchConfig;
use quarry_core::traits::IRerankProvider;

use crate::search::FusedChunk;

/// Rerank the filtered candidates.
///
/// Only the top `rerank_max_documents` documents (in fused order) and at
/// most `per_document` chunks from each are sent out. Chunks outside the
/// cap, and any candidate the provider returned no score for, keep
/// their original fused score. Output sorted by final score descending,
/// ties by chunk id.
pub fn rerank(
    provider: &dyn IRerankProvider,
    query: &str,
    filtered: &[FusedChunk],
    doc_of: &HashMap<String, String>,
    content_of: &HashMap<String, &str>,
    per_document: usize,
    config: &SearchConfig,
) -> Vec<FusedChunk> {
    if filtered.is_empty() {
        return Vec::new();
    }

    // Top documents by first appearance in fused order.
    let mut selected: Vec<&str> = Vec::new();
    for chunk in filtered {
        if let Some(doc) = doc_of.get(&chunk.chunk_id) {
            if !selected.iter().any(|d| d == doc) {
                selected.push(doc.as_str());
                if selected.len() >= config.rerank_max_documents {
                    break;
                }
            }
        }
    }
    let selected: HashSet<&str> = selected.into_iter().collect();

    // Bounded per-document candidate collection, fused order preserved.
    let mut taken_per_doc: HashMap<&str, usize> = HashMap::new();
    let mut candidate_ids: Vec<&str> = Vec::new();
    let mut candidate_texts: Vec<String> = Vec::new();
    for chunk in filtered {
        let Some(doc) = doc_of.get(&chunk.chunk_id) else {
            continue;
        };
        if !selected.contains(doc.as_str()) {
            continue;
        }
        let taken = taken_per_doc.entry(doc.as_str()).or_insert(0);
        if *taken >= per_document {
            continue;
        }
        let Some(content) = content_of.get(&chunk.chunk_id) else {
            continue;
        };
        *taken += 1;
        candidate_ids.push(chunk.chunk_id.as_str());
        candidate_texts.push((*content).to_string());
    }

    if candidate_texts.is_empty() {
        return filtered.to_vec();
    }

    // One external call for the whole batch.
    let scores = match provider.rerank(query, &candidate_texts) {
        Ok(scores) => scores,
        Err(e) => {
            warn!(error = %e, "rerank call failed, keeping fused order");
            return filtered.to_vec();
        }
    };

    if scores.len() < candidate_texts.len() {
        warn!(
            sent = candidate_texts.len(),
            scored = scores.len(),
            "rerank returned fewer scores than candidates, unscored keep fused score"
        );
    }

    // Scatter scores back by chunk id; the unscored tail keeps its
    // fused score.
    let rescored: HashMap<&str, f64> = candidate_ids
        .iter()
        .zip(scores.iter())
        .map(|(id, score)| (*id, *score as f64))
        .collect();

    let mut output: Vec<FusedChunk> = filtered
        .iter()
        .map(|chunk| {
            let mut chunk = chunk.clone();
            if let Some(score) = rescored.get(chunk.chunk_id.as_str()) {
                chunk.score = *score;
            }
            chunk
        })
        .collect();

    output.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });

    debug!(
        candidates = candidate_ids.len(),
        scored = rescored.len(),
        "rerank complete"
    );
    output
}

//! SearchEngine: orchestrates the full query pipeline.
//!
//! cache lookup → intent classification → keyword ‖ vector scan →
//! RRF fusion → document relevance filter → batched rerank → cache
//! write. The whole run is request-scoped; only provider calls block.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use quarry_core::config::{CacheConfig, SearchConfig};
use quarry_core::errors::QuarryResult;
use quarry_core::models::{Chunk, ConversationTurn, SearchHit};
use quarry_core::traits::{IChunkStore, IEmbeddingProvider, IRerankProvider};
use quarry_core::IntentResult;

use crate::cache::QueryCache;
use crate::intent::IntentEngine;
use crate::ranking;
use crate::search::{self, FusionWeights};

/// Cooperative cancellation handle for an in-flight query.
///
/// A caller that abandons a run (user stopped generation) cancels the
/// flag; in-flight provider calls are not interrupted, but the result
/// is never written into the cache for the superseded query.
#[derive(Clone, Default)]
pub struct CancellationFlag {
    inner: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}

/// Per-query options.
#[derive(Clone, Default)]
pub struct SearchOptions {
    /// Overrides the intent-derived result limit.
    pub limit: Option<usize>,
    /// Recent conversation turns, newest last.
    pub history: Vec<ConversationTurn>,
    pub cancel: Option<CancellationFlag>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub intent: IntentResult,
    pub cache_hit: bool,
}

/// The main search engine.
pub struct SearchEngine {
    chunk_store: Arc<dyn IChunkStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
    reranker: Option<Arc<dyn IRerankProvider>>,
    intent_engine: IntentEngine,
    cache: QueryCache,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(
        chunk_store: Arc<dyn IChunkStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        config: SearchConfig,
        cache_config: &CacheConfig,
    ) -> Self {
        Self {
            chunk_store,
            embedder,
            reranker: None,
            intent_engine: IntentEngine::new(),
            cache: QueryCache::new(cache_config),
            config,
        }
    }

    /// Attach an external reranker. Without one the pipeline returns
    /// the document filter's order.
    pub fn with_reranker(mut self, reranker: Arc<dyn IRerankProvider>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Replace the intent engine (e.g. with parameter overrides).
    pub fn with_intent_engine(mut self, intent_engine: IntentEngine) -> Self {
        self.intent_engine = intent_engine;
        self
    }

    /// Run the full pipeline for one query.
    ///
    /// Zero hits is a valid "no relevant content found" result, not an
    /// error.
    pub fn search(&self, query: &str, options: &SearchOptions) -> QuarryResult<SearchOutcome> {
        // Step 1: Classify intent and derive parameters.
        let mut intent = self.intent_engine.classify(query, &options.history);
        if let Some(limit) = options.limit {
            intent.params.limit = limit;
        }
        debug!(intent = %intent.intent, confidence = intent.confidence, "classified intent");

        // Step 2: Cache lookup precedes everything else.
        let key = QueryCache::key(query, intent.intent, &intent.params);
        if let Some(hits) = self.cache.get(&key) {
            debug!("query cache hit");
            return Ok(SearchOutcome {
                hits: hits.as_ref().clone(),
                intent,
                cache_hit: true,
            });
        }

        // Step 3: Load the candidate set. Parent chunks supply
        // surrounding context to the answer step once a child is
        // selected; the retrieval units are child/window chunks.
        let chunks: Vec<Chunk> = self
            .chunk_store
            .all_chunks()?
            .into_iter()
            .filter(Chunk::requires_embedding)
            .collect();
        if chunks.is_empty() {
            return Ok(SearchOutcome {
                hits: Vec::new(),
                intent,
                cache_hit: false,
            });
        }

        // Step 4: Query embedding. Provider trouble degrades the run to
        // keyword-only rather than failing it.
        let query_embedding = if self.embedder.is_available() {
            match self.embedder.embed(query) {
                Ok(embedding) => Some(embedding),
                Err(e) => {
                    warn!(error = %e, "query embedding failed, keyword-only search");
                    None
                }
            }
        } else {
            None
        };

        // Step 5: Keyword ‖ vector scan, joined before fusion.
        let (keyword_hits, vector_hits) = search::hybrid_scan(
            query,
            query_embedding.as_deref(),
            &chunks,
            intent.params.min_score,
            &self.config,
        );

        // Step 6: Reciprocal Rank Fusion with intent-derived weights.
        let weights = FusionWeights::for_intent(intent.intent, &self.config);
        let fused = search::fuse(
            &keyword_hits,
            &vector_hits,
            weights,
            self.config.fusion_prefix,
        );

        let by_id: HashMap<&str, &Chunk> =
            chunks.iter().map(|c| (c.id.as_str(), c)).collect();
        let doc_of: HashMap<String, String> = chunks
            .iter()
            .map(|c| (c.id.clone(), c.document_id.clone()))
            .collect();

        // Strongest keyword score per document, for the filter's direct
        // match bypass.
        let mut keyword_doc_scores: HashMap<String, f64> = HashMap::new();
        for hit in &keyword_hits {
            if let Some(doc) = doc_of.get(&hit.chunk_id) {
                let entry = keyword_doc_scores.entry(doc.clone()).or_insert(0.0);
                *entry = entry.max(hit.score);
            }
        }

        // Step 7: Document relevance filter.
        let filtered =
            ranking::filter_by_document(&fused, &doc_of, &keyword_doc_scores, &self.config);
        if filtered.is_empty() {
            debug!("no relevant documents");
            return Ok(SearchOutcome {
                hits: Vec::new(),
                intent,
                cache_hit: false,
            });
        }

        // Step 8: Single batched rerank call across the top documents.
        let ranked = match &self.reranker {
            Some(reranker) if reranker.is_available() => {
                let content_of: HashMap<String, &str> = chunks
                    .iter()
                    .map(|c| (c.id.clone(), c.content.as_str()))
                    .collect();
                ranking::rerank(
                    reranker.as_ref(),
                    query,
                    &filtered,
                    &doc_of,
                    &content_of,
                    intent.params.rerank_candidates,
                    &self.config,
                )
            }
            _ => filtered,
        };

        // Step 9: Materialize hits up to the limit.
        let hits: Vec<SearchHit> = ranked
            .iter()
            .take(intent.params.limit)
            .filter_map(|fused_chunk| {
                by_id.get(fused_chunk.chunk_id.as_str()).map(|chunk| SearchHit {
                    chunk: (*chunk).clone(),
                    score: fused_chunk.score,
                    sources: fused_chunk.sources.clone(),
                })
            })
            .collect();

        info!(
            hits = hits.len(),
            intent = %intent.intent,
            "search pipeline complete"
        );

        // Step 10: Never cache a superseded query's result.
        let cancelled = options
            .cancel
            .as_ref()
            .is_some_and(CancellationFlag::is_cancelled);
        if cancelled {
            debug!("query cancelled, skipping cache write");
        } else {
            self.cache.insert(key, hits.clone());
        }

        Ok(SearchOutcome {
            hits,
            intent,
            cache_hit: false,
        })
    }

    /// Periodic cache maintenance hook.
    pub fn sweep_cache(&self) {
        self.cache.sweep();
    }

    /// Drop all cached results (e.g. after deleting a document).
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }
}

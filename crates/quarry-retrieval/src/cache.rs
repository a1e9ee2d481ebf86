//! TTL query result cache in front of the whole pipeline.
//!
//! Keys are blake3 hashes of (normalized query, intent, normalized
//! parameter set). Entries are immutable once written and expire after
//! a fixed window; moka evicts lazily on access, with `sweep` as the
//! periodic maintenance hook. Nothing is persisted — the cache rebuilds
//! from empty on restart.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use quarry_core::config::CacheConfig;
use quarry_core::models::SearchHit;
use quarry_core::{Intent, SearchParams};

/// Query result cache. A hit returns without touching the pipeline.
pub struct QueryCache {
    cache: Cache<String, Arc<Vec<SearchHit>>>,
}

impl QueryCache {
    /// Create a cache with the configured TTL and capacity.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();

        Self { cache }
    }

    /// Cache key for a query in context: normalized query text, intent,
    /// and the parameter tuple that shaped the pipeline run.
    pub fn key(query: &str, intent: Intent, params: &SearchParams) -> String {
        let normalized = query.trim().to_lowercase();
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        let material = format!(
            "{normalized}\x1f{intent}\x1f{}\x1f{}\x1f{:.4}",
            params.limit, params.rerank_candidates, params.min_score
        );
        blake3::hash(material.as_bytes()).to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Vec<SearchHit>>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, hits: Vec<SearchHit>) {
        self.cache.insert(key, Arc::new(hits));
    }

    /// Periodic maintenance: flush pending eviction work so expired
    /// entries are reclaimed without waiting for the next lookup.
    pub fn sweep(&self) {
        self.cache.run_pending_tasks();
    }

    /// Number of live entries.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate all entries (e.g. after a document is deleted).
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

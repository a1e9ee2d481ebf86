//! Full-stack scenario: ingest markdown → background embedding →
//! hybrid search, exercising chunking, storage, the task queue, and the
//! retrieval pipeline together.

use std::sync::Arc;

use quarry_core::config::{CacheConfig, ChunkingConfig, QueueConfig, SearchConfig};
use quarry_core::errors::{ProviderError, QuarryResult};
use quarry_core::models::SearchSource;
use quarry_core::traits::{IChunkStore, IDocumentStore, IEmbeddingProvider, ITaskStore};
use quarry_core::{DocumentStatus, TaskStatus};
use quarry_chunking::scanner::fence_marker_count;
use quarry_embeddings::{IngestionPipeline, TaskQueue};
use quarry_retrieval::{SearchEngine, SearchOptions};
use quarry_storage::StorageEngine;

const DIMS: usize = 4;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env(),
        )
        .with_test_writer()
        .try_init();
}

fn topic_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    let mut v = vec![0.0f32; DIMS];
    if lower.contains("bgp") || lower.contains("neighbor") {
        v[0] = 1.0;
    }
    if lower.contains("configure") || lower.contains("configuration") {
        v[1] = 1.0;
    }
    if lower.contains("ospf") {
        v[2] = 1.0;
    }
    if v.iter().all(|x| *x == 0.0) {
        v[3] = 1.0;
    }
    v
}

struct TopicEmbedder {
    healthy: bool,
}

impl IEmbeddingProvider for TopicEmbedder {
    fn embed(&self, text: &str) -> QuarryResult<Vec<f32>> {
        Ok(self.embed_batch(&[text.to_string()])?.remove(0))
    }
    fn embed_batch(&self, texts: &[String]) -> QuarryResult<Vec<Vec<f32>>> {
        if !self.healthy {
            return Err(ProviderError::Transient {
                provider: "topic".to_string(),
                reason: "outage".to_string(),
            }
            .into());
        }
        Ok(texts.iter().map(|t| topic_vector(t)).collect())
    }
    fn dimensions(&self) -> usize {
        DIMS
    }
    fn name(&self) -> &str {
        "topic"
    }
    fn is_available(&self) -> bool {
        true
    }
}

const GUIDE: &str = "\
# BGP Setup

BGP neighbor configuration starts with the remote AS number.

```
router bgp 65000
 neighbor 10.0.0.1 remote-as 65001
```

## Verification

Confirm the session with the summary command once it establishes.

# OSPF Notes

OSPF areas reduce flooding scope on large topologies.
";

fn build_stack(
    healthy_embedder: bool,
) -> (Arc<StorageEngine>, IngestionPipeline, SearchEngine) {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let embedder: Arc<TopicEmbedder> = Arc::new(TopicEmbedder {
        healthy: healthy_embedder,
    });

    let queue = Arc::new(TaskQueue::new(
        storage.clone() as Arc<dyn IChunkStore>,
        storage.clone() as Arc<dyn ITaskStore>,
        storage.clone() as Arc<dyn IDocumentStore>,
        embedder.clone(),
        QueueConfig {
            batch_size: 4,
            max_attempts: 2,
            backoff_base_ms: 1,
        },
    ));

    let pipeline = IngestionPipeline::new(
        storage.clone() as Arc<dyn IDocumentStore>,
        storage.clone() as Arc<dyn IChunkStore>,
        queue,
        ChunkingConfig {
            parent_target_chars: 300,
            child_target_chars: 120,
            child_overlap_chars: 30,
            preview_chars: 80,
        },
    );

    let engine = SearchEngine::new(
        storage.clone() as Arc<dyn IChunkStore>,
        embedder,
        SearchConfig::default(),
        &CacheConfig::default(),
    );

    (storage, pipeline, engine)
}

#[test]
fn ingest_then_search_finds_the_bgp_passage() {
    init_tracing();
    let (storage, pipeline, engine) = build_stack(true);

    let receipt = pipeline
        .ingest_blocking("BGP Guide", "routing", GUIDE)
        .unwrap();
    assert!(receipt.chunk_count > 0);
    let task = receipt.task.expect("embedding task");
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.fail_count, 0);

    let doc = storage.get_document(&receipt.document.id).unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Ready);
    assert!(!doc.preview.is_empty());

    // No chunk carries an unterminated code fence.
    for chunk in storage.all_chunks().unwrap() {
        assert_eq!(fence_marker_count(&chunk.content) % 2, 0);
    }

    let outcome = engine
        .search("how to configure BGP", &SearchOptions::default())
        .unwrap();
    let hit = outcome
        .hits
        .iter()
        .take(20)
        .find(|h| h.chunk.content.contains("BGP neighbor configuration"))
        .expect("BGP passage in top-20 results");
    assert!(hit.sources.contains(&SearchSource::Keyword));
}

#[test]
fn provider_outage_leaves_document_searchable_lexically() {
    let (storage, pipeline, engine) = build_stack(false);

    let receipt = pipeline
        .ingest_blocking("BGP Guide", "routing", GUIDE)
        .unwrap();
    let task = receipt.task.expect("embedding task");
    assert_eq!(task.success_count, 0);
    assert!(task.fail_count > 0);

    let doc = storage.get_document(&receipt.document.id).unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::EmbeddingIncomplete);

    // Chunks readable, no embeddings anywhere.
    let chunks = storage.chunks_for_document(&receipt.document.id).unwrap();
    assert!(!chunks.is_empty());
    assert!(chunks.iter().all(|c| c.embedding.is_none()));

    // Lexical search still reaches the content; vector contributes
    // nothing.
    let outcome = engine
        .search("bgp neighbor", &SearchOptions::default())
        .unwrap();
    assert!(!outcome.hits.is_empty());
    for hit in &outcome.hits {
        assert_eq!(hit.sources, vec![SearchSource::Keyword]);
    }
}

#[test]
fn recovery_completes_after_outage_heals() {
    let (storage, pipeline, _engine) = build_stack(false);
    let receipt = pipeline
        .ingest_blocking("BGP Guide", "routing", GUIDE)
        .unwrap();

    // Provider healed: a fresh queue over the same storage recovers the
    // document.
    let healed_queue = TaskQueue::new(
        storage.clone() as Arc<dyn IChunkStore>,
        storage.clone() as Arc<dyn ITaskStore>,
        storage.clone() as Arc<dyn IDocumentStore>,
        Arc::new(TopicEmbedder { healthy: true }),
        QueueConfig {
            batch_size: 4,
            max_attempts: 2,
            backoff_base_ms: 1,
        },
    );

    let task = healed_queue
        .enqueue_blocking(&receipt.document.id)
        .unwrap()
        .expect("recovery task");
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.fail_count, 0);

    let doc = storage.get_document(&receipt.document.id).unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Ready);
    assert!(storage
        .chunks_missing_embeddings(&receipt.document.id)
        .unwrap()
        .is_empty());
}

//! # quarry-retrieval
//!
//! The query side of the engine: intent classification, concurrent
//! keyword + vector scoring, Reciprocal Rank Fusion with intent-derived
//! weighting, document-level relevance filtering, the batched reranker
//! adapter, and the TTL query cache. `SearchEngine` orchestrates the
//! whole pipeline.

pub mod cache;
pub mod engine;
pub mod intent;
pub mod ranking;
pub mod search;

pub use cache::QueryCache;
pub use engine::{CancellationFlag, SearchEngine, SearchOptions, SearchOutcome};
pub use intent::IntentEngine;

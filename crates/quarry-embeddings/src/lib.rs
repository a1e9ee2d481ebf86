//! # quarry-embeddings
//!
//! Client for the external embedding/rerank providers and the resilient
//! background task queue that computes embeddings for newly ingested
//! chunks: fixed-size batches, bounded exponential-backoff retries, one
//! batched write per batch, progress reporting, and startup recovery.

pub mod ingest;
pub mod provider;
pub mod queue;

pub use ingest::IngestionPipeline;
pub use provider::{HttpEmbeddingProvider, HttpRerankProvider};
pub use queue::TaskQueue;

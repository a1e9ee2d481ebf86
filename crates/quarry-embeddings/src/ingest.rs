//! Ingestion facade.
//!
//! The external collaborator hands over already-extracted plain text;
//! chunking runs synchronously, the embedding task is enqueued
//! asynchronously afterward. Upload succeeds once chunking completes,
//! regardless of later embedding failures.

use std::sync::Arc;

use tracing::info;

use quarry_core::config::ChunkingConfig;
use quarry_core::errors::QuarryResult;
use quarry_core::models::{Document, DocumentStatus, EmbeddingTask};
use quarry_core::traits::{IChunkStore, IDocumentStore};
use quarry_chunking::ChunkBuilder;

use crate::queue::TaskQueue;

/// Outcome of ingesting one document.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub document: Document,
    pub chunk_count: usize,
    /// The embedding task, absent when nothing needed embedding.
    pub task: Option<EmbeddingTask>,
}

/// Chunks and persists extracted document text, then hands the document
/// to the embedding queue.
pub struct IngestionPipeline {
    document_store: Arc<dyn IDocumentStore>,
    chunk_store: Arc<dyn IChunkStore>,
    queue: Arc<TaskQueue>,
    config: ChunkingConfig,
}

impl IngestionPipeline {
    pub fn new(
        document_store: Arc<dyn IDocumentStore>,
        chunk_store: Arc<dyn IChunkStore>,
        queue: Arc<TaskQueue>,
        config: ChunkingConfig,
    ) -> Self {
        Self {
            document_store,
            chunk_store,
            queue,
            config,
        }
    }

    /// Ingest one document. The embedding task runs in the background.
    pub fn ingest(&self, title: &str, category: &str, text: &str) -> QuarryResult<IngestReceipt> {
        self.ingest_inner(title, category, text, false)
    }

    /// Ingest and wait for the embedding task to finish. Used by tests
    /// and one-shot imports.
    pub fn ingest_blocking(
        &self,
        title: &str,
        category: &str,
        text: &str,
    ) -> QuarryResult<IngestReceipt> {
        self.ingest_inner(title, category, text, true)
    }

    fn ingest_inner(
        &self,
        title: &str,
        category: &str,
        text: &str,
        blocking: bool,
    ) -> QuarryResult<IngestReceipt> {
        let mut document = Document::new(title, category, text.len() as u64);
        document.preview = preview(text, self.config.preview_chars);
        self.document_store.create_document(&document)?;

        let builder = ChunkBuilder::new(self.config.clone());
        let chunks = builder.build(&document.id, text);
        let chunk_count = self.chunk_store.insert_chunks(&chunks)?;

        info!(
            document_id = %document.id,
            chunks = chunk_count,
            "document chunked and persisted"
        );

        let task = if blocking {
            self.queue.enqueue_blocking(&document.id)?
        } else {
            self.queue.enqueue(&document.id)?
        };

        if task.is_none() {
            // Nothing to embed (e.g. empty document): searchable as-is.
            self.document_store
                .set_document_status(&document.id, DocumentStatus::Ready)?;
            document.status = DocumentStatus::Ready;
        }

        Ok(IngestReceipt {
            document,
            chunk_count,
            task,
        })
    }
}

/// First `max_chars` characters of the text, whitespace-collapsed.
fn preview(text: &str, max_chars: usize) -> String {
    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(max_chars) {
        Some((byte, _)) => collapsed[..byte].to_string(),
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_collapses_whitespace() {
        assert_eq!(preview("a\n\nb   c", 100), "a b c");
        assert_eq!(preview("hello world", 5), "hello");
    }
}

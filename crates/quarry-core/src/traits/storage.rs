use crate::errors::QuarryResult;
use crate::models::{Chunk, Document, DocumentStatus, EmbeddingTask};

/// Document CRUD. Documents are owned by the ingestion collaborator;
/// only category and status are editable once `Ready`.
pub trait IDocumentStore: Send + Sync {
    fn create_document(&self, document: &Document) -> QuarryResult<()>;
    fn get_document(&self, id: &str) -> QuarryResult<Option<Document>>;
    fn list_documents(&self) -> QuarryResult<Vec<Document>>;
    fn set_document_status(&self, id: &str, status: DocumentStatus) -> QuarryResult<()>;
    fn set_document_category(&self, id: &str, category: &str) -> QuarryResult<()>;
    /// Deletes the document and all its chunks.
    fn delete_document(&self, id: &str) -> QuarryResult<()>;
}

/// Chunk persistence. Chunks are bulk-created at ingestion and immutable
/// except for embedding assignment; the embedding worker writes only the
/// `embedding` field, in batches.
pub trait IChunkStore: Send + Sync {
    /// Bulk insert, one transaction. Returns the number inserted.
    fn insert_chunks(&self, chunks: &[Chunk]) -> QuarryResult<usize>;
    fn get_chunk(&self, id: &str) -> QuarryResult<Option<Chunk>>;
    /// All chunks of one document, ordered by `chunk_index`.
    fn chunks_for_document(&self, document_id: &str) -> QuarryResult<Vec<Chunk>>;
    /// The full candidate set for search, ordered by document then index.
    fn all_chunks(&self) -> QuarryResult<Vec<Chunk>>;
    /// `Child`/`Window` chunks of a document still lacking an embedding.
    fn chunks_missing_embeddings(&self, document_id: &str) -> QuarryResult<Vec<Chunk>>;
    /// Document ids with at least one chunk lacking a required embedding.
    fn documents_missing_embeddings(&self) -> QuarryResult<Vec<String>>;
    /// Batched embedding write: one transaction for the whole batch.
    /// Returns the number of rows updated.
    fn write_embeddings(&self, updates: &[(String, Vec<f32>)]) -> QuarryResult<usize>;
}

/// Embedding task persistence. The partial unique index on active tasks
/// makes `create_task` the atomic "skip if an active task exists" check.
pub trait ITaskStore: Send + Sync {
    /// Insert a new task. Fails with `StorageError::DuplicateActiveTask`
    /// if the document already has a pending/processing task.
    fn create_task(&self, task: &EmbeddingTask) -> QuarryResult<()>;
    fn get_task(&self, id: &str) -> QuarryResult<Option<EmbeddingTask>>;
    /// Most recent task for a document, for progress display.
    fn task_for_document(&self, document_id: &str) -> QuarryResult<Option<EmbeddingTask>>;
    fn active_task_for_document(&self, document_id: &str)
        -> QuarryResult<Option<EmbeddingTask>>;
    fn update_task(&self, task: &EmbeddingTask) -> QuarryResult<()>;
}

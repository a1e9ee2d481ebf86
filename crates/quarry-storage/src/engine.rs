//! StorageEngine — owns ConnectionPool, implements IDocumentStore +
//! IChunkStore + ITaskStore, startup migrations.

use std::path::Path;

use quarry_core::errors::QuarryResult;
use quarry_core::models::{Chunk, Document, DocumentStatus, EmbeddingTask};
use quarry_core::traits::{IChunkStore, IDocumentStore, ITaskStore};

use crate::migrations;
use crate::pool::{ConnectionPool, DEFAULT_READERS};

/// The main storage engine. Owns the connection pool and provides the
/// full document + chunk + task interface. Reads go to the pool's
/// read-only connections; every mutation funnels through the writer.
pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> QuarryResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open(path, DEFAULT_READERS)?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing). The pool is
    /// reader-less in this mode; reads route through the writer.
    pub fn open_in_memory() -> QuarryResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the write connection.
    fn initialize(&self) -> QuarryResult<()> {
        self.pool
            .with_writer(|conn| migrations::run_migrations(conn))
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }
}

impl IDocumentStore for StorageEngine {
    fn create_document(&self, document: &Document) -> QuarryResult<()> {
        self.pool
            .with_writer(|conn| crate::queries::document_ops::insert_document(conn, document))
    }

    fn get_document(&self, id: &str) -> QuarryResult<Option<Document>> {
        self.pool
            .with_reader(|conn| crate::queries::document_ops::get_document(conn, id))
    }

    fn list_documents(&self) -> QuarryResult<Vec<Document>> {
        self.pool
            .with_reader(crate::queries::document_ops::list_documents)
    }

    fn set_document_status(&self, id: &str, status: DocumentStatus) -> QuarryResult<()> {
        self.pool
            .with_writer(|conn| crate::queries::document_ops::set_status(conn, id, status))
    }

    fn set_document_category(&self, id: &str, category: &str) -> QuarryResult<()> {
        self.pool
            .with_writer(|conn| crate::queries::document_ops::set_category(conn, id, category))
    }

    fn delete_document(&self, id: &str) -> QuarryResult<()> {
        self.pool
            .with_writer(|conn| crate::queries::document_ops::delete_document(conn, id))
    }
}

impl IChunkStore for StorageEngine {
    fn insert_chunks(&self, chunks: &[Chunk]) -> QuarryResult<usize> {
        self.pool
            .with_writer(|conn| crate::queries::chunk_crud::insert_chunks(conn, chunks))
    }

    fn get_chunk(&self, id: &str) -> QuarryResult<Option<Chunk>> {
        self.pool
            .with_reader(|conn| crate::queries::chunk_crud::get_chunk(conn, id))
    }

    fn chunks_for_document(&self, document_id: &str) -> QuarryResult<Vec<Chunk>> {
        self.pool.with_reader(|conn| {
            crate::queries::chunk_query::chunks_for_document(conn, document_id)
        })
    }

    fn all_chunks(&self) -> QuarryResult<Vec<Chunk>> {
        self.pool.with_reader(crate::queries::chunk_query::all_chunks)
    }

    fn chunks_missing_embeddings(&self, document_id: &str) -> QuarryResult<Vec<Chunk>> {
        self.pool.with_reader(|conn| {
            crate::queries::chunk_query::chunks_missing_embeddings(conn, document_id)
        })
    }

    fn documents_missing_embeddings(&self) -> QuarryResult<Vec<String>> {
        self.pool
            .with_reader(crate::queries::chunk_query::documents_missing_embeddings)
    }

    fn write_embeddings(&self, updates: &[(String, Vec<f32>)]) -> QuarryResult<usize> {
        self.pool
            .with_writer(|conn| crate::queries::embedding_ops::write_embeddings(conn, updates))
    }
}

impl ITaskStore for StorageEngine {
    fn create_task(&self, task: &EmbeddingTask) -> QuarryResult<()> {
        self.pool
            .with_writer(|conn| crate::queries::task_ops::insert_task(conn, task))
    }

    fn get_task(&self, id: &str) -> QuarryResult<Option<EmbeddingTask>> {
        self.pool
            .with_reader(|conn| crate::queries::task_ops::get_task(conn, id))
    }

    fn task_for_document(&self, document_id: &str) -> QuarryResult<Option<EmbeddingTask>> {
        self.pool
            .with_reader(|conn| crate::queries::task_ops::task_for_document(conn, document_id))
    }

    fn active_task_for_document(
        &self,
        document_id: &str,
    ) -> QuarryResult<Option<EmbeddingTask>> {
        self.pool.with_reader(|conn| {
            crate::queries::task_ops::active_task_for_document(conn, document_id)
        })
    }

    fn update_task(&self, task: &EmbeddingTask) -> QuarryResult<()> {
        self.pool
            .with_writer(|conn| crate::queries::task_ops::update_task(conn, task))
    }
}

//! The embedding task queue.
//!
//! An explicit task store object injected into the queue and the status
//! interface — no ambient global task map. The storage layer's partial
//! unique index makes task creation the atomic "skip if active" check;
//! the in-process registry only tracks spawned workers for observability.

pub mod worker;

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{error, info, warn};

use quarry_core::config::QueueConfig;
use quarry_core::errors::{QuarryError, QuarryResult, StorageError};
use quarry_core::models::EmbeddingTask;
use quarry_core::traits::{IChunkStore, IDocumentStore, IEmbeddingProvider, ITaskStore};

/// Outcome of attempting to create a task for a document.
enum Created {
    /// New task row inserted; a worker should run it.
    Fresh(EmbeddingTask),
    /// Another task is already active for the document.
    Existing(EmbeddingTask),
    /// Nothing left to embed.
    Nothing,
}

/// Long-running background queue computing missing chunk embeddings.
///
/// Document upload returns before embeddings are ready; workers run on
/// the tokio blocking pool (or a plain thread outside a runtime) and are
/// polled via [`TaskQueue::task_status`].
pub struct TaskQueue {
    chunk_store: Arc<dyn IChunkStore>,
    task_store: Arc<dyn ITaskStore>,
    document_store: Arc<dyn IDocumentStore>,
    provider: Arc<dyn IEmbeddingProvider>,
    config: QueueConfig,
    /// document_id → task_id for workers spawned by this queue.
    in_flight: Arc<DashMap<String, String>>,
}

impl TaskQueue {
    pub fn new(
        chunk_store: Arc<dyn IChunkStore>,
        task_store: Arc<dyn ITaskStore>,
        document_store: Arc<dyn IDocumentStore>,
        provider: Arc<dyn IEmbeddingProvider>,
        config: QueueConfig,
    ) -> Self {
        Self {
            chunk_store,
            task_store,
            document_store,
            provider,
            config,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Create a task for the document's missing embeddings and run it in
    /// the background. Returns `None` when every chunk is already
    /// embedded, and the existing task (without spawning a second
    /// worker) when one is already active.
    pub fn enqueue(&self, document_id: &str) -> QuarryResult<Option<EmbeddingTask>> {
        match self.create_task(document_id)? {
            Created::Fresh(task) => {
                self.spawn_worker(task.clone());
                Ok(Some(task))
            }
            Created::Existing(task) => Ok(Some(task)),
            Created::Nothing => Ok(None),
        }
    }

    /// Synchronous variant: create the task and run the worker inline.
    /// Used by tests and one-shot maintenance commands.
    pub fn enqueue_blocking(&self, document_id: &str) -> QuarryResult<Option<EmbeddingTask>> {
        match self.create_task(document_id)? {
            Created::Fresh(task) => {
                let finished = worker::run_task(
                    self.chunk_store.as_ref(),
                    self.task_store.as_ref(),
                    self.document_store.as_ref(),
                    self.provider.as_ref(),
                    &self.config,
                    task,
                )?;
                Ok(Some(finished))
            }
            Created::Existing(task) => Ok(Some(task)),
            Created::Nothing => Ok(None),
        }
    }

    /// Startup recovery: create a task for every document with chunks
    /// still lacking embeddings, skipping documents that already have an
    /// active task. Idempotent — fully embedded documents are untouched.
    pub fn recover(&self) -> QuarryResult<Vec<EmbeddingTask>> {
        let documents = self.chunk_store.documents_missing_embeddings()?;
        let mut tasks = Vec::new();
        for document_id in documents {
            if self
                .task_store
                .active_task_for_document(&document_id)?
                .is_some()
            {
                continue;
            }
            if let Some(task) = self.enqueue(&document_id)? {
                tasks.push(task);
            }
        }
        if !tasks.is_empty() {
            info!(recovered = tasks.len(), "recovery scan created embedding tasks");
        }
        Ok(tasks)
    }

    /// Most recent task for a document, for progress display.
    pub fn task_status(&self, document_id: &str) -> QuarryResult<Option<EmbeddingTask>> {
        self.task_store.task_for_document(document_id)
    }

    /// Number of workers currently spawned by this queue.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Insert the task row. The partial unique index resolves the
    /// creation race: the loser gets `DuplicateActiveTask` and returns
    /// the winner's task instead of running a second worker.
    fn create_task(&self, document_id: &str) -> QuarryResult<Created> {
        let missing = self.chunk_store.chunks_missing_embeddings(document_id)?;
        if missing.is_empty() {
            return Ok(Created::Nothing);
        }

        let task = EmbeddingTask::new(document_id, missing.len());
        match self.task_store.create_task(&task) {
            Ok(()) => Ok(Created::Fresh(task)),
            Err(QuarryError::Storage(StorageError::DuplicateActiveTask { .. })) => {
                warn!(document_id, "embedding task already active, skipping");
                match self.task_store.active_task_for_document(document_id)? {
                    Some(existing) => Ok(Created::Existing(existing)),
                    // The winner finished between our insert and lookup.
                    None => Ok(Created::Nothing),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn spawn_worker(&self, task: EmbeddingTask) {
        let chunk_store = Arc::clone(&self.chunk_store);
        let task_store = Arc::clone(&self.task_store);
        let document_store = Arc::clone(&self.document_store);
        let provider = Arc::clone(&self.provider);
        let config = self.config.clone();
        let registry = Arc::clone(&self.in_flight);
        let document_id = task.document_id.clone();
        registry.insert(document_id.clone(), task.id.clone());

        let job = move || {
            let result = worker::run_task(
                chunk_store.as_ref(),
                task_store.as_ref(),
                document_store.as_ref(),
                provider.as_ref(),
                &config,
                task,
            );
            if let Err(e) = result {
                error!(document_id = %document_id, error = %e, "embedding worker failed");
            }
            registry.remove(&document_id);
        };

        // Workers block on provider calls and storage writes, so they
        // belong on the blocking pool. Outside a runtime (CLI tools,
        // plain tests) fall back to a dedicated thread.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                std::thread::spawn(job);
            }
        }
    }
}

//! Batch embedding worker.
//!
//! Processes one task: enumerate chunks lacking embeddings, embed them
//! in fixed-size batches with up to 3 attempts per batch (exponential
//! backoff), persist each successful batch in a single write, and update
//! progress after every batch. A batch that exhausts retries marks its
//! chunks failed without blocking subsequent batches; only enumeration
//! and persistence errors fail the whole task. Every exit, fatal or
//! not, leaves the document status reflecting the outcome — a document
//! is never stranded in `Processing` by a failed task.

use std::time::Duration;

use tracing::{debug, info, warn};

use quarry_core::config::QueueConfig;
use quarry_core::constants::EMBEDDING_INPUT_MIN_CHARS;
use quarry_core::errors::{QuarryError, QuarryResult};
use quarry_core::models::{Chunk, DocumentStatus, EmbeddingTask, TaskStatus};
use quarry_core::traits::{IChunkStore, IDocumentStore, IEmbeddingProvider, ITaskStore};

use crate::provider::truncate_input;

/// Run one embedding task to completion. Returns the finished task.
pub fn run_task(
    chunk_store: &dyn IChunkStore,
    task_store: &dyn ITaskStore,
    document_store: &dyn IDocumentStore,
    provider: &dyn IEmbeddingProvider,
    config: &QueueConfig,
    mut task: EmbeddingTask,
) -> QuarryResult<EmbeddingTask> {
    task.mark_processing();
    task_store.update_task(&task)?;

    // Enumeration failure fails the whole task.
    let chunks = match chunk_store.chunks_missing_embeddings(&task.document_id) {
        Ok(chunks) => chunks,
        Err(e) => {
            return abort_task(
                task,
                task_store,
                document_store,
                DocumentStatus::Error,
                format!("chunk enumeration failed: {e}"),
            );
        }
    };

    // The set may have changed since task creation.
    task.total = chunks.len();

    // Content too short to embed: skipped and counted, never retried.
    let (embeddable, skipped): (Vec<Chunk>, Vec<Chunk>) = chunks
        .into_iter()
        .partition(|c| c.content.trim().chars().count() >= EMBEDDING_INPUT_MIN_CHARS);
    if !skipped.is_empty() {
        for chunk in &skipped {
            warn!(chunk_id = %chunk.id, "content too short to embed, skipping");
        }
        task.record_batch(0, skipped.len());
    }

    for batch in embeddable.chunks(config.batch_size.max(1)) {
        let texts: Vec<String> = batch
            .iter()
            .map(|c| truncate_input(&c.content, quarry_core::constants::EMBEDDING_INPUT_MAX_CHARS))
            .collect();

        match embed_with_retry(provider, &texts, config) {
            Ok(embeddings) if embeddings.len() == batch.len() => {
                let updates: Vec<(String, Vec<f32>)> = batch
                    .iter()
                    .zip(embeddings)
                    .map(|(chunk, embedding)| (chunk.id.clone(), embedding))
                    .collect();

                // Persistence failure fails the whole task.
                if let Err(e) = chunk_store.write_embeddings(&updates) {
                    return abort_task(
                        task,
                        task_store,
                        document_store,
                        DocumentStatus::Error,
                        format!("embedding write failed: {e}"),
                    );
                }
                task.record_batch(batch.len(), 0);
                debug!(
                    document_id = %task.document_id,
                    progress = task.progress,
                    "embedded batch"
                );
            }
            Ok(embeddings) => {
                warn!(
                    expected = batch.len(),
                    got = embeddings.len(),
                    "provider returned a short embedding batch, marking batch failed"
                );
                task.record_batch(0, batch.len());
            }
            Err(e) if is_fatal(&e) => {
                // Missing credentials: fatal to the task, not retried.
                // The chunks stay readable without embeddings.
                return abort_task(
                    task,
                    task_store,
                    document_store,
                    DocumentStatus::EmbeddingIncomplete,
                    e.to_string(),
                );
            }
            Err(e) => {
                warn!(
                    document_id = %task.document_id,
                    error = %e,
                    "batch exhausted retries, continuing with next batch"
                );
                task.record_batch(0, batch.len());
            }
        }

        task_store.update_task(&task)?;
    }

    task.mark_completed();
    task_store.update_task(&task)?;

    // A task where nothing succeeded leaves the document visibly
    // incomplete; any success promotes it to searchable.
    let status = if task.success_count == 0 && task.total > 0 {
        DocumentStatus::EmbeddingIncomplete
    } else {
        DocumentStatus::Ready
    };
    document_store.set_document_status(&task.document_id, status)?;

    info!(
        document_id = %task.document_id,
        succeeded = task.success_count,
        failed = task.fail_count,
        "embedding task finished"
    );
    Ok(task)
}

/// Fatal exit: persist the failed task and surface the failure on the
/// document before returning, so it never stays stuck in `Processing`.
fn abort_task(
    mut task: EmbeddingTask,
    task_store: &dyn ITaskStore,
    document_store: &dyn IDocumentStore,
    status: DocumentStatus,
    error: String,
) -> QuarryResult<EmbeddingTask> {
    warn!(
        document_id = %task.document_id,
        error = %error,
        "embedding task aborted"
    );
    task.mark_failed(error);
    task_store.update_task(&task)?;
    document_store.set_document_status(&task.document_id, status)?;
    Ok(task)
}

/// Attempt a batch embedding call with bounded exponential backoff.
/// Only transient provider errors are retried.
fn embed_with_retry(
    provider: &dyn IEmbeddingProvider,
    texts: &[String],
    config: &QueueConfig,
) -> QuarryResult<Vec<Vec<f32>>> {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match provider.embed_batch(texts) {
            Ok(embeddings) => return Ok(embeddings),
            Err(e) => {
                let retryable = matches!(
                    &e,
                    QuarryError::Provider(p) if p.is_retryable()
                );
                if !retryable || attempt >= config.max_attempts.max(1) {
                    return Err(e);
                }
                let delay = config.backoff_base_ms.saturating_mul(1 << (attempt - 1));
                warn!(attempt, delay_ms = delay, error = %e, "embedding call failed, backing off");
                std::thread::sleep(Duration::from_millis(delay));
            }
        }
    }
}

/// Whether an error should abort the whole task immediately.
fn is_fatal(e: &QuarryError) -> bool {
    matches!(
        e,
        QuarryError::Provider(quarry_core::errors::ProviderError::MissingCredentials { .. })
    )
}

/// Whether a finished task embedded everything it set out to.
pub fn is_fully_embedded(task: &EmbeddingTask) -> bool {
    task.status == TaskStatus::Completed && task.fail_count == 0
}

//! Integration tests for the embedding task store, in particular the
//! one-active-task-per-document constraint.

use quarry_core::errors::{QuarryError, StorageError};
use quarry_core::models::EmbeddingTask;
use quarry_core::traits::ITaskStore;
use quarry_core::TaskStatus;
use quarry_storage::StorageEngine;

fn test_storage() -> StorageEngine {
    StorageEngine::open_in_memory().expect("in-memory storage")
}

#[test]
fn create_and_get_roundtrip() {
    let storage = test_storage();
    let task = EmbeddingTask::new("doc-1", 24);
    storage.create_task(&task).unwrap();

    let loaded = storage.get_task(&task.id).unwrap().unwrap();
    assert_eq!(loaded.document_id, "doc-1");
    assert_eq!(loaded.status, TaskStatus::Pending);
    assert_eq!(loaded.total, 24);
}

#[test]
fn second_active_task_is_rejected() {
    let storage = test_storage();
    storage.create_task(&EmbeddingTask::new("doc-1", 10)).unwrap();

    let err = storage
        .create_task(&EmbeddingTask::new("doc-1", 10))
        .unwrap_err();
    assert!(matches!(
        err,
        QuarryError::Storage(StorageError::DuplicateActiveTask { .. })
    ));
}

#[test]
fn terminal_task_allows_a_new_one() {
    let storage = test_storage();
    let mut task = EmbeddingTask::new("doc-1", 10);
    storage.create_task(&task).unwrap();

    task.mark_processing();
    storage.update_task(&task).unwrap();
    task.mark_completed();
    storage.update_task(&task).unwrap();

    // The unique index only covers active tasks.
    storage.create_task(&EmbeddingTask::new("doc-1", 4)).unwrap();
}

#[test]
fn active_task_lookup() {
    let storage = test_storage();
    assert!(storage.active_task_for_document("doc-1").unwrap().is_none());

    let mut task = EmbeddingTask::new("doc-1", 10);
    storage.create_task(&task).unwrap();
    assert!(storage.active_task_for_document("doc-1").unwrap().is_some());

    task.mark_failed("provider down");
    storage.update_task(&task).unwrap();
    assert!(storage.active_task_for_document("doc-1").unwrap().is_none());
}

#[test]
fn task_for_document_returns_most_recent() {
    let storage = test_storage();
    let mut first = EmbeddingTask::new("doc-1", 10);
    storage.create_task(&first).unwrap();
    first.mark_completed();
    storage.update_task(&first).unwrap();

    let mut second = EmbeddingTask::new("doc-1", 2);
    second.created_at = first.created_at + chrono::Duration::seconds(5);
    storage.create_task(&second).unwrap();

    let latest = storage.task_for_document("doc-1").unwrap().unwrap();
    assert_eq!(latest.id, second.id);
}

#[test]
fn progress_persists_across_updates() {
    let storage = test_storage();
    let mut task = EmbeddingTask::new("doc-1", 32);
    storage.create_task(&task).unwrap();

    task.mark_processing();
    task.record_batch(16, 0);
    storage.update_task(&task).unwrap();

    let loaded = storage.get_task(&task.id).unwrap().unwrap();
    assert_eq!(loaded.current, 16);
    assert_eq!(loaded.success_count, 16);
    assert!((loaded.progress - 50.0).abs() < 0.01);
}

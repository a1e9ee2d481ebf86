//! Embedding task persistence.
//!
//! `insert_task` is the atomic "skip if an active task exists" check:
//! the partial unique index on active tasks turns a race between two
//! creators into a constraint violation for the loser.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use quarry_core::errors::{QuarryError, QuarryResult, StorageError};
use quarry_core::models::{EmbeddingTask, TaskStatus};

use crate::to_storage_err;

pub fn insert_task(conn: &Connection, task: &EmbeddingTask) -> QuarryResult<()> {
    let result = conn.execute(
        "INSERT INTO embedding_tasks (
            id, document_id, status, processed_count, total_count, progress,
            error, success_count, fail_count, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            task.id,
            task.document_id,
            task.status.as_str(),
            task.current as i64,
            task.total as i64,
            task.progress as f64,
            task.error,
            task.success_count as i64,
            task.fail_count as i64,
            task.created_at.to_rfc3339(),
            task.updated_at.to_rfc3339(),
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => {
            Err(QuarryError::Storage(StorageError::DuplicateActiveTask {
                document_id: task.document_id.clone(),
            }))
        }
        Err(e) => Err(to_storage_err(e.to_string())),
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e.sqlite_error_code(),
        Some(rusqlite::ErrorCode::ConstraintViolation)
    )
}

pub fn get_task(conn: &Connection, id: &str) -> QuarryResult<Option<EmbeddingTask>> {
    query_one(conn, &format!("{TASK_SELECT} WHERE id = ?1"), id)
}

/// Most recent task for a document, for progress display.
pub fn task_for_document(
    conn: &Connection,
    document_id: &str,
) -> QuarryResult<Option<EmbeddingTask>> {
    query_one(
        conn,
        &format!("{TASK_SELECT} WHERE document_id = ?1 ORDER BY created_at DESC, id LIMIT 1"),
        document_id,
    )
}

pub fn active_task_for_document(
    conn: &Connection,
    document_id: &str,
) -> QuarryResult<Option<EmbeddingTask>> {
    query_one(
        conn,
        &format!(
            "{TASK_SELECT} WHERE document_id = ?1
               AND status IN ('pending', 'processing')
             LIMIT 1"
        ),
        document_id,
    )
}

pub fn update_task(conn: &Connection, task: &EmbeddingTask) -> QuarryResult<()> {
    conn.execute(
        "UPDATE embedding_tasks SET
            status = ?2, processed_count = ?3, total_count = ?4, progress = ?5,
            error = ?6, success_count = ?7, fail_count = ?8, updated_at = ?9
         WHERE id = ?1",
        params![
            task.id,
            task.status.as_str(),
            task.current as i64,
            task.total as i64,
            task.progress as f64,
            task.error,
            task.success_count as i64,
            task.fail_count as i64,
            task.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

const TASK_SELECT: &str = "SELECT id, document_id, status, processed_count, total_count, \
     progress, error, success_count, fail_count, created_at, updated_at FROM embedding_tasks";

fn query_one(conn: &Connection, sql: &str, arg: &str) -> QuarryResult<Option<EmbeddingTask>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut rows = stmt
        .query_map(params![arg], parse_task_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    match rows.next() {
        Some(row) => Ok(Some(row.map_err(|e| to_storage_err(e.to_string()))??)),
        None => Ok(None),
    }
}

fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<QuarryResult<EmbeddingTask>> {
    let id: String = row.get(0)?;
    let document_id: String = row.get(1)?;
    let status: String = row.get(2)?;
    let current: usize = row.get::<_, i64>(3)? as usize;
    let total: usize = row.get::<_, i64>(4)? as usize;
    let progress: f64 = row.get(5)?;
    let error: Option<String> = row.get(6)?;
    let success_count: usize = row.get::<_, i64>(7)? as usize;
    let fail_count: usize = row.get::<_, i64>(8)? as usize;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok((|| {
        let status = TaskStatus::parse(&status)
            .ok_or_else(|| to_storage_err(format!("unknown task status: {status}")))?;
        let parse_ts = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| to_storage_err(format!("bad timestamp: {e}")))
        };
        Ok(EmbeddingTask {
            id,
            document_id,
            status,
            current,
            total,
            progress: progress as f32,
            error,
            success_count,
            fail_count,
            created_at: parse_ts(&created_at)?,
            updated_at: parse_ts(&updated_at)?,
        })
    })())
}

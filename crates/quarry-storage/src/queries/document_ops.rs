//! Document CRUD and status/category edits.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use quarry_core::errors::QuarryResult;
use quarry_core::models::{Document, DocumentStatus};

use crate::to_storage_err;

pub fn insert_document(conn: &Connection, document: &Document) -> QuarryResult<()> {
    conn.execute(
        "INSERT INTO documents (id, title, category, size_bytes, uploaded_at, status, preview)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            document.id,
            document.title,
            document.category,
            document.size_bytes as i64,
            document.uploaded_at.to_rfc3339(),
            document.status.as_str(),
            document.preview,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_document(conn: &Connection, id: &str) -> QuarryResult<Option<Document>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, category, size_bytes, uploaded_at, status, preview
             FROM documents WHERE id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut rows = stmt
        .query_map(params![id], parse_document_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    match rows.next() {
        Some(row) => Ok(Some(row.map_err(|e| to_storage_err(e.to_string()))??)),
        None => Ok(None),
    }
}

pub fn list_documents(conn: &Connection) -> QuarryResult<Vec<Document>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, category, size_bytes, uploaded_at, status, preview
             FROM documents ORDER BY uploaded_at DESC, id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], parse_document_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(documents)
}

pub fn set_status(conn: &Connection, id: &str, status: DocumentStatus) -> QuarryResult<()> {
    conn.execute(
        "UPDATE documents SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn set_category(conn: &Connection, id: &str, category: &str) -> QuarryResult<()> {
    conn.execute(
        "UPDATE documents SET category = ?2 WHERE id = ?1",
        params![id, category],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Delete a document. Chunks go with it via ON DELETE CASCADE.
pub fn delete_document(conn: &Connection, id: &str) -> QuarryResult<()> {
    conn.execute("DELETE FROM documents WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

fn parse_document_row(row: &Row<'_>) -> rusqlite::Result<QuarryResult<Document>> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let category: String = row.get(2)?;
    let size_bytes: i64 = row.get(3)?;
    let uploaded_at: String = row.get(4)?;
    let status: String = row.get(5)?;
    let preview: String = row.get(6)?;

    Ok((|| {
        let uploaded_at = DateTime::parse_from_rfc3339(&uploaded_at)
            .map_err(|e| to_storage_err(format!("bad uploaded_at: {e}")))?
            .with_timezone(&Utc);
        let status = DocumentStatus::parse(&status)
            .ok_or_else(|| to_storage_err(format!("unknown document status: {status}")))?;
        Ok(Document {
            id,
            title,
            category,
            size_bytes: size_bytes as u64,
            uploaded_at,
            status,
            preview,
        })
    })())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an ingested document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Chunked, embeddings not yet computed.
    Processing,
    /// Fully indexed and searchable.
    Ready,
    /// Chunks readable, but the last embedding task produced no
    /// vectors (failed outright or failed on every batch). Lexical
    /// search still covers the document; vector search omits it.
    EmbeddingIncomplete,
    /// Ingestion itself failed.
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Ready => "ready",
            DocumentStatus::EmbeddingIncomplete => "embedding_incomplete",
            DocumentStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(DocumentStatus::Processing),
            "ready" => Some(DocumentStatus::Ready),
            "embedding_incomplete" => Some(DocumentStatus::EmbeddingIncomplete),
            "error" => Some(DocumentStatus::Error),
            _ => None,
        }
    }
}

/// A source document. Owned by the ingestion collaborator; referenced by
/// chunks via `document_id`. Immutable once `Ready` except for
/// category/status edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// UUID v4 identifier.
    pub id: String,
    pub title: String,
    pub category: String,
    /// Byte size of the original upload.
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
    pub status: DocumentStatus,
    /// Short content preview for listings.
    pub preview: String,
}

impl Document {
    /// Create a new document in `Processing` state.
    pub fn new(title: impl Into<String>, category: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            category: category.into(),
            size_bytes,
            uploaded_at: Utc::now(),
            status: DocumentStatus::Processing,
            preview: String::new(),
        }
    }
}

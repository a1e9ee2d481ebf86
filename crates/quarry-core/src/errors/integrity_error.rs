/// Data-integrity violations. Skipped and logged, never retried.
#[derive(Debug, thiserror::Error)]
pub enum IntegrityError {
    #[error("chunk {chunk_id} references missing parent {parent_id}")]
    DanglingParent { chunk_id: String, parent_id: String },

    #[error("chunk {chunk_id} content too short to embed ({len} chars)")]
    ContentTooShort { chunk_id: String, len: usize },

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    /// The partial unique index on active tasks rejected an insert.
    #[error("document {document_id} already has an active embedding task")]
    DuplicateActiveTask { document_id: String },

    #[error("read pool lock poisoned: {message}")]
    LockPoisoned { message: String },
}

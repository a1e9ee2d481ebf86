//! # quarry-storage
//!
//! SQLite persistence layer. One write connection plus a round-robin
//! read pool (WAL mode), versioned migrations, and the query modules
//! implementing the core storage traits.
//!
//! Chunks are stored scoped by `document_id` so one document's chunks
//! load and write without scanning the corpus. The embedding worker only
//! ever touches the `embedding` columns, in batched transactions.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use quarry_core::errors::{QuarryError, StorageError};

/// Wrap a SQLite error message into the workspace error type.
pub(crate) fn to_storage_err(message: String) -> QuarryError {
    StorageError::SqliteError { message }.into()
}

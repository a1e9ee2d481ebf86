//! Error taxonomy for the Quarry workspace.
//!
//! Each subsystem has its own `thiserror` enum; `QuarryError` is the
//! umbrella type crossing crate boundaries. A cache miss is not an error
//! anywhere in this taxonomy — it is normal fallthrough to the pipeline.

mod integrity_error;
mod provider_error;
mod retrieval_error;
mod storage_error;

pub use integrity_error::IntegrityError;
pub use provider_error::ProviderError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

/// Umbrella error for all Quarry subsystems.
#[derive(Debug, thiserror::Error)]
pub enum QuarryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used across the workspace.
pub type QuarryResult<T> = Result<T, QuarryError>;

//! # quarry-core
//!
//! Foundation crate for the Quarry retrieval engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod intent;
pub mod models;
pub mod tokens;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::QuarryConfig;
pub use errors::{QuarryError, QuarryResult};
pub use intent::{Intent, IntentResult, SearchParams};
pub use models::{Chunk, ChunkType, Document, DocumentStatus, EmbeddingTask, TaskStatus};

//! Domain models shared across the workspace.

mod chunk;
mod document;
mod query;
mod task;

pub use chunk::{Chunk, ChunkType};
pub use document::{Document, DocumentStatus};
pub use query::{ConversationTurn, SearchHit, SearchSource};
pub use task::{EmbeddingTask, TaskStatus};

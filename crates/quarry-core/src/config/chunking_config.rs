use serde::{Deserialize, Serialize};

use super::defaults;

/// Chunk builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target parent chunk size (chars). A single atomic unit larger than
    /// this is kept whole rather than split.
    pub parent_target_chars: usize,
    /// Target child chunk size (chars).
    pub child_target_chars: usize,
    /// Overlap between consecutive child chunks (chars).
    pub child_overlap_chars: usize,
    /// Length of the document preview extracted at ingestion (chars).
    pub preview_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            parent_target_chars: defaults::PARENT_TARGET_CHARS,
            child_target_chars: defaults::CHILD_TARGET_CHARS,
            child_overlap_chars: defaults::CHILD_OVERLAP_CHARS,
            preview_chars: defaults::PREVIEW_CHARS,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding task queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Chunks per external embedding call.
    pub batch_size: usize,
    /// Calls per batch (initial attempt plus retries) before its chunks
    /// are marked failed.
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; doubles per retry.
    pub backoff_base_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::QUEUE_BATCH_SIZE,
            max_attempts: defaults::QUEUE_MAX_ATTEMPTS,
            backoff_base_ms: defaults::QUEUE_BACKOFF_BASE_MS,
        }
    }
}

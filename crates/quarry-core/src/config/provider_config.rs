use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// External embedding/rerank provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Embedding endpoint URL.
    pub embedding_endpoint: String,
    /// Rerank endpoint URL.
    pub rerank_endpoint: String,
    /// API key. Empty means unconfigured; calls fail with
    /// `ProviderError::MissingCredentials` instead of being retried.
    pub api_key: String,
    /// Embedding vector dimensions.
    pub dimensions: usize,
    /// Per-input character cap applied before embedding calls.
    pub max_input_chars: usize,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            embedding_endpoint: String::new(),
            rerank_endpoint: String::new(),
            api_key: String::new(),
            dimensions: defaults::EMBEDDING_DIMENSIONS,
            max_input_chars: constants::EMBEDDING_INPUT_MAX_CHARS,
            timeout_secs: defaults::PROVIDER_TIMEOUT_SECS,
        }
    }
}

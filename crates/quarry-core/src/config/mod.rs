//! Centrally-defined tuning configuration.
//!
//! Every threshold, window size, and weight the pipeline uses lives here
//! as a named default, so constants are testable and tunable without
//! touching algorithm code. Defaults are hardcoded; a TOML file can
//! override any subset.

pub mod defaults;

mod cache_config;
mod chunking_config;
mod provider_config;
mod queue_config;
mod search_config;

pub use cache_config::CacheConfig;
pub use chunking_config::ChunkingConfig;
pub use provider_config::ProviderConfig;
pub use queue_config::QueueConfig;
pub use search_config::SearchConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the whole workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarryConfig {
    pub chunking: ChunkingConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
    pub queue: QueueConfig,
    pub provider: ProviderConfig,
}

impl QuarryConfig {
    /// Parse a TOML override file. Missing sections and fields keep their
    /// defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_from_empty_toml() {
        let config = QuarryConfig::from_toml("").unwrap();
        assert_eq!(config.chunking.parent_target_chars, defaults::PARENT_TARGET_CHARS);
        assert_eq!(config.cache.ttl_secs, defaults::CACHE_TTL_SECS);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = QuarryConfig::from_toml(
            "[search]\nfusion_prefix = 100\n",
        )
        .unwrap();
        assert_eq!(config.search.fusion_prefix, 100);
        assert_eq!(config.search.document_ratio, defaults::DOCUMENT_RATIO);
        assert_eq!(config.queue.batch_size, defaults::QUEUE_BATCH_SIZE);
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Query result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Fixed TTL window in seconds.
    pub ttl_secs: u64,
    /// Maximum cached query results.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::CACHE_TTL_SECS,
            max_entries: defaults::CACHE_MAX_ENTRIES,
        }
    }
}

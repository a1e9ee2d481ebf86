/// Quarry system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum batch size for bulk chunk inserts.
pub const MAX_BULK_BATCH_SIZE: usize = 1000;

/// Maximum characters sent to the embedding provider per input string.
/// Longer chunk content is truncated at a char boundary before the call.
pub const EMBEDDING_INPUT_MAX_CHARS: usize = 2000;

/// Minimum content length (chars) worth embedding. Shorter chunks are
/// skipped and logged rather than sent to the provider.
pub const EMBEDDING_INPUT_MIN_CHARS: usize = 3;

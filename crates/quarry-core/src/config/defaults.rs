//! Named default values for every tunable in the system.

// --- Chunking ---

/// Target parent chunk size in characters.
pub const PARENT_TARGET_CHARS: usize = 4000;
/// Target child chunk size in characters.
pub const CHILD_TARGET_CHARS: usize = 500;
/// Overlap between consecutive child chunks in characters.
pub const CHILD_OVERLAP_CHARS: usize = 150;
/// Length of the document preview extracted at ingestion.
pub const PREVIEW_CHARS: usize = 200;

// --- Search / fusion ---

/// Bonus for an exact full-query substring match in keyword scoring.
pub const EXACT_MATCH_BONUS: f64 = 10.0;
/// Points per matched query token in keyword scoring.
pub const TOKEN_MATCH_POINTS: f64 = 1.0;
/// Prefix of each ranked list considered by RRF fusion.
pub const FUSION_PREFIX: usize = 60;
/// RRF smoothing constant for lexical-leaning intents.
pub const RRF_K_LEXICAL: f64 = 40.0;
/// RRF smoothing constant for semantic-leaning intents.
pub const RRF_K_SEMANTIC: f64 = 60.0;
/// Multiplier on the favored list's contributions.
pub const FUSION_WEIGHT_BOOST: f64 = 1.2;

// --- Document relevance filter ---

/// A document passes when its mean fused score is at least
/// `max_avg * DOCUMENT_RATIO`.
pub const DOCUMENT_RATIO: f64 = 0.25;
/// Keyword score at or above this bypasses the ratio test outright.
pub const KEYWORD_BYPASS_FLOOR: f64 = 10.0;

// --- Reranking ---

/// Documents included in the single batched rerank call.
pub const RERANK_MAX_DOCUMENTS: usize = 3;
/// Candidate chunks per document offered to the reranker.
pub const RERANK_PER_DOCUMENT: usize = 15;

// --- Intent ---

/// Conversation turns inspected by the intent classifier.
pub const HISTORY_WINDOW: usize = 6;
/// Confidence multiplier when a follow-up inherits the prior turn's intent.
pub const INHERITED_CONFIDENCE_FACTOR: f64 = 0.7;

// --- Cache ---

/// Query result cache TTL in seconds (15 minutes).
pub const CACHE_TTL_SECS: u64 = 900;
/// Maximum cached query results.
pub const CACHE_MAX_ENTRIES: u64 = 2048;

// --- Embedding queue ---

/// Chunks per external embedding call.
pub const QUEUE_BATCH_SIZE: usize = 16;
/// Calls per batch: the initial attempt plus three backed-off retries.
pub const QUEUE_MAX_ATTEMPTS: u32 = 4;
/// Base backoff delay in milliseconds (doubles per retry: 1s, 2s, 4s).
pub const QUEUE_BACKOFF_BASE_MS: u64 = 1000;

// --- Provider ---

/// Embedding vector dimensions expected from the provider.
pub const EMBEDDING_DIMENSIONS: usize = 1024;
/// HTTP timeout for provider calls, in seconds.
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;

use crate::errors::QuarryResult;

/// External embedding scoring capability.
///
/// Request is a batch of plain-text strings (each already truncated to a
/// safe length); response is one fixed-dimension vector per input string,
/// order-preserving.
pub trait IEmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> QuarryResult<Vec<f32>>;
    fn embed_batch(&self, texts: &[String]) -> QuarryResult<Vec<Vec<f32>>>;
    fn dimensions(&self) -> usize;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
}

/// External second-pass relevance scoring capability.
///
/// Request is a query plus an ordered candidate list; response is one
/// relevance score per candidate, order-preserving. A short response is
/// tolerated by the caller (unscored tail keeps its fused score).
pub trait IRerankProvider: Send + Sync {
    fn rerank(&self, query: &str, candidates: &[String]) -> QuarryResult<Vec<f32>>;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
}

//! Post-fusion ranking: document relevance filtering and the batched
//! reranker adapter.

pub mod document_filter;
pub mod reranker;

pub use document_filter::filter_by_document;
pub use reranker::rerank;

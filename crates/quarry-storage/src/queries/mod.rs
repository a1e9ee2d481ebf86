//! Query modules, one per concern.

pub mod chunk_crud;
pub mod chunk_query;
pub mod document_ops;
pub mod embedding_ops;
pub mod task_ops;

use serde::{Deserialize, Serialize};

/// Position of a chunk in the two-level hierarchy.
///
/// `Parent` chunks supply surrounding context to the answer-generation
/// step and are never vector-scored. `Child` and `Window` chunks are the
/// retrieval units and carry a `parent_id` back to their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Parent,
    Child,
    Window,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Parent => "parent",
            ChunkType::Child => "child",
            ChunkType::Window => "window",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "parent" => Some(ChunkType::Parent),
            "child" => Some(ChunkType::Child),
            "window" => Some(ChunkType::Window),
            _ => None,
        }
    }
}

/// A stored passage of document text eligible for indexing and search.
///
/// Created in bulk by the chunk builder at ingestion time; immutable
/// thereafter except for embedding assignment. Deleted only with the
/// owning document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// UUID v4 identifier.
    pub id: String,
    pub document_id: String,
    /// Stable ordering within the document. Never reused.
    pub chunk_index: u32,
    pub chunk_type: ChunkType,
    pub content: String,
    /// Heuristic token estimate (see `tokens::estimate`).
    pub token_count: usize,
    /// Set only on `Child`/`Window` chunks; resolves to a `Parent` chunk
    /// in the same document. Parents never reference children.
    pub parent_id: Option<String>,
    /// Fixed-dimension embedding vector, absent until computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    /// Whether this chunk participates in vector scoring once embedded.
    pub fn requires_embedding(&self) -> bool {
        !matches!(self.chunk_type, ChunkType::Parent)
    }

    /// blake3 hash of the content, used for embedding cache keys.
    pub fn content_hash(&self) -> String {
        blake3::hash(self.content.as_bytes()).to_hex().to_string()
    }
}

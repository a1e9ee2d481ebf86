use serde::{Deserialize, Serialize};

use super::chunk::Chunk;

/// Which ranked list(s) contributed a chunk during fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    Keyword,
    Vector,
}

/// A ranked passage returned from the search pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub score: f64,
    pub sources: Vec<SearchSource>,
}

/// One prior turn of the conversation, newest last.
///
/// Only the raw text is carried; the intent classifier re-derives whatever
/// it needs from recent turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub text: String,
}

impl ConversationTurn {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

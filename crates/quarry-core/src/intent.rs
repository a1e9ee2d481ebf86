//! Query intent taxonomy and per-intent search parameters.
//!
//! Classification rules live in quarry-retrieval; this module defines the
//! fixed 10-value taxonomy, the tie-break priority order, and the
//! parameter tuple each intent maps to.

use serde::{Deserialize, Serialize};

/// Coarse classification of query purpose, used to select search
/// parameters and fusion weighting. Classification always yields exactly
/// one intent; `General` is the default when no rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Command,
    Troubleshoot,
    Configuration,
    Explanation,
    Comparison,
    Performance,
    BestPractice,
    Verification,
    Question,
    General,
}

impl Intent {
    /// Number of taxonomy values.
    pub const COUNT: usize = 10;

    /// All intents, in declaration order.
    pub const ALL: [Intent; Intent::COUNT] = [
        Intent::Command,
        Intent::Troubleshoot,
        Intent::Configuration,
        Intent::Explanation,
        Intent::Comparison,
        Intent::Performance,
        Intent::BestPractice,
        Intent::Verification,
        Intent::Question,
        Intent::General,
    ];

    /// Tie-break priority: lower wins when rule scores are equal.
    pub fn priority(&self) -> u8 {
        match self {
            Intent::Troubleshoot => 0,
            Intent::Performance => 1,
            Intent::BestPractice => 2,
            Intent::Verification => 3,
            Intent::Configuration => 4,
            Intent::Explanation => 5,
            Intent::Comparison => 6,
            Intent::Command => 7,
            Intent::Question => 8,
            Intent::General => 9,
        }
    }

    /// Lexical-leaning intents get a lower RRF `k` and a boosted
    /// keyword-list weight; the rest lean semantic.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            Intent::Command | Intent::Configuration | Intent::Verification
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Command => "command",
            Intent::Troubleshoot => "troubleshoot",
            Intent::Configuration => "configuration",
            Intent::Explanation => "explanation",
            Intent::Comparison => "comparison",
            Intent::Performance => "performance",
            Intent::BestPractice => "best_practice",
            Intent::Verification => "verification",
            Intent::Question => "question",
            Intent::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Intent::ALL.iter().copied().find(|i| i.as_str() == s)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retrieval parameters derived from a classified intent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum hits returned to the caller.
    pub limit: usize,
    /// Candidates per document offered to the reranker.
    pub rerank_candidates: usize,
    /// Cosine similarity floor for vector scoring.
    pub min_score: f64,
}

/// Outcome of intent classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    /// Winning score normalized against the sum of all intent scores.
    pub confidence: f64,
    /// Ordered list of matched signals, for diagnostics.
    pub reasons: Vec<String>,
    pub params: SearchParams,
}

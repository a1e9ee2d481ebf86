//! Lexical scoring over chunk text.
//!
//! Tokenization extracts runs of ASCII alphanumerics and runs of CJK
//! ideographs as separate token classes; word-boundary-free languages
//! need character-run tokenization rather than whitespace splitting.
//! An exact full-query substring match contributes a large fixed bonus,
//! each matched token one point. Zero-score chunks are excluded.

use quarry_core::config::SearchConfig;
use quarry_core::models::Chunk;
use quarry_core::tokens::is_cjk;

/// A chunk scored by the lexical pass.
#[derive(Debug, Clone)]
pub struct KeywordHit {
    pub chunk_id: String,
    pub score: f64,
}

/// Extract query tokens: lowercased ASCII alphanumeric runs and CJK
/// ideograph runs. Duplicates are removed, order preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut ascii_run = String::new();
    let mut cjk_run = String::new();

    let mut flush = |run: &mut String, out: &mut Vec<String>| {
        if !run.is_empty() {
            let token = std::mem::take(run);
            if !out.contains(&token) {
                out.push(token);
            }
        }
    };

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            flush(&mut cjk_run, &mut tokens);
            ascii_run.extend(c.to_lowercase());
        } else if is_cjk(c) {
            flush(&mut ascii_run, &mut tokens);
            cjk_run.push(c);
        } else {
            flush(&mut ascii_run, &mut tokens);
            flush(&mut cjk_run, &mut tokens);
        }
    }
    flush(&mut ascii_run, &mut tokens);
    flush(&mut cjk_run, &mut tokens);

    tokens
}

/// Score candidate chunks against the query. Output is sorted by score
/// descending, ties broken by chunk id for determinism.
pub fn score_chunks(query: &str, chunks: &[Chunk], config: &SearchConfig) -> Vec<KeywordHit> {
    let normalized_query = query.trim().to_lowercase();
    if normalized_query.is_empty() {
        return Vec::new();
    }
    let tokens = tokenize(&normalized_query);

    let mut hits: Vec<KeywordHit> = chunks
        .iter()
        .filter_map(|chunk| {
            let content = chunk.content.to_lowercase();
            let mut score = 0.0;

            if content.contains(&normalized_query) {
                score += config.exact_match_bonus;
            }
            for token in &tokens {
                if content.contains(token.as_str()) {
                    score += config.token_match_points;
                }
            }

            (score > 0.0).then(|| KeywordHit {
                chunk_id: chunk.id.clone(),
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::models::ChunkType;

    fn chunk(id: &str, content: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            document_id: "doc".to_string(),
            chunk_index: 0,
            chunk_type: ChunkType::Child,
            content: content.to_string(),
            token_count: 0,
            parent_id: None,
            embedding: None,
        }
    }

    #[test]
    fn tokenize_ascii_runs() {
        assert_eq!(tokenize("how to configure BGP"), vec!["how", "to", "configure", "bgp"]);
    }

    #[test]
    fn tokenize_cjk_runs_separately() {
        // Mixed script: ASCII run, CJK run, ASCII run.
        assert_eq!(tokenize("bgp配置路由guide"), vec!["bgp", "配置路由", "guide"]);
    }

    #[test]
    fn tokenize_dedups() {
        assert_eq!(tokenize("bgp bgp BGP"), vec!["bgp"]);
    }

    #[test]
    fn exact_match_outranks_token_matches() {
        let config = SearchConfig::default();
        let chunks = vec![
            chunk("a", "BGP neighbor configuration steps"),
            chunk("b", "configuration of neighbor devices and bgp timers"),
        ];
        let hits = score_chunks("BGP neighbor configuration", &chunks, &config);
        assert_eq!(hits[0].chunk_id, "a");
        // Exact substring bonus + 3 tokens.
        assert!(hits[0].score >= config.exact_match_bonus + 3.0 - f64::EPSILON);
        // Tokens only.
        assert!((hits[1].score - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_score_chunks_excluded() {
        let config = SearchConfig::default();
        let chunks = vec![chunk("a", "completely unrelated text about ospf")];
        let hits = score_chunks("mpls vpn", &chunks, &config);
        assert!(hits.is_empty());
    }

    #[test]
    fn ties_break_by_chunk_id() {
        let config = SearchConfig::default();
        let chunks = vec![chunk("b", "bgp here"), chunk("a", "bgp there")];
        let hits = score_chunks("bgp", &chunks, &config);
        assert_eq!(hits[0].chunk_id, "a");
        assert_eq!(hits[1].chunk_id, "b");
    }

    #[test]
    fn cjk_query_matches_cjk_content() {
        let config = SearchConfig::default();
        let chunks = vec![chunk("a", "路由器配置指南: BGP 邻居")];
        let hits = score_chunks("配置", &chunks, &config);
        assert_eq!(hits.len(), 1);
    }
}

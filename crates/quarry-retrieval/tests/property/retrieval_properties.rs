//! Property tests: RRF monotonicity, filter boundary behavior,
//! pipeline determinism.

use std::collections::HashMap;

use proptest::prelude::*;

use quarry_core::config::SearchConfig;
use quarry_core::models::SearchSource;
use quarry_retrieval::ranking::filter_by_document;
use quarry_retrieval::search::{fuse, FusedChunk, FusionWeights, KeywordHit, VectorHit};

fn kw_list(len: usize) -> Vec<KeywordHit> {
    (0..len)
        .map(|i| KeywordHit {
            chunk_id: format!("k{i:04}"),
            score: (len - i) as f64,
        })
        .collect()
}

fn vec_list(len: usize) -> Vec<VectorHit> {
    (0..len)
        .map(|i| VectorHit {
            chunk_id: format!("v{i:04}"),
            similarity: 1.0 - (i as f64 / len.max(1) as f64),
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_rrf_scores_non_increasing_within_single_list(
        len in 1usize..80,
        k in 1.0f64..120.0,
    ) {
        let weights = FusionWeights { k, keyword_weight: 1.0, vector_weight: 1.0 };
        let fused = fuse(&kw_list(len), &[], weights, 100);

        // Single-source list: fused order preserves list order and the
        // score is monotonically non-increasing as rank increases.
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn prop_fusion_is_deterministic(
        klen in 0usize..40,
        vlen in 0usize..40,
    ) {
        let weights = FusionWeights { k: 60.0, keyword_weight: 1.2, vector_weight: 1.0 };
        let a = fuse(&kw_list(klen), &vec_list(vlen), weights, 60);
        let b = fuse(&kw_list(klen), &vec_list(vlen), weights, 60);

        let ids_a: Vec<&str> = a.iter().map(|c| c.chunk_id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|c| c.chunk_id.as_str()).collect();
        prop_assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn prop_document_exactly_at_ratio_threshold_passes(
        best in 0.01f64..10.0,
    ) {
        let config = SearchConfig::default();
        // The weaker document's mean sits exactly at max_avg * ratio,
        // computed with the same expression the filter uses.
        let at_threshold = best * config.document_ratio;

        let fused_list = vec![
            FusedChunk { chunk_id: "a1".to_string(), score: best, sources: vec![SearchSource::Vector] },
            FusedChunk { chunk_id: "b1".to_string(), score: at_threshold, sources: vec![SearchSource::Vector] },
        ];
        let doc_of: HashMap<String, String> = [
            ("a1".to_string(), "docA".to_string()),
            ("b1".to_string(), "docB".to_string()),
        ].into();

        let kept = filter_by_document(&fused_list, &doc_of, &HashMap::new(), &config);
        prop_assert_eq!(kept.len(), 2, "document at the exact threshold must pass");
    }

    #[test]
    fn prop_filter_never_invents_chunks(
        scores in prop::collection::vec(0.001f64..1.0, 1..30),
    ) {
        let config = SearchConfig::default();
        let fused_list: Vec<FusedChunk> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| FusedChunk {
                chunk_id: format!("c{i:03}"),
                score: *s,
                sources: vec![SearchSource::Keyword],
            })
            .collect();
        let doc_of: HashMap<String, String> = fused_list
            .iter()
            .enumerate()
            .map(|(i, c)| (c.chunk_id.clone(), format!("doc{}", i % 3)))
            .collect();

        let kept = filter_by_document(&fused_list, &doc_of, &HashMap::new(), &config);
        prop_assert!(kept.len() <= fused_list.len());

        // Output preserves the input's relative order.
        let positions: Vec<usize> = kept
            .iter()
            .map(|c| fused_list.iter().position(|f| f.chunk_id == c.chunk_id).unwrap())
            .collect();
        for pair in positions.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}

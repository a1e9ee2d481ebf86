//! Fusion cost at the bounded prefix and beyond.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quarry_retrieval::search::{fuse, FusionWeights, KeywordHit, VectorHit};

fn make_lists(len: usize) -> (Vec<KeywordHit>, Vec<VectorHit>) {
    let keyword = (0..len)
        .map(|i| KeywordHit {
            chunk_id: format!("chunk-{i:05}"),
            score: (len - i) as f64,
        })
        .collect();
    // Half the vector list overlaps the keyword list.
    let vector = (0..len)
        .map(|i| VectorHit {
            chunk_id: if i % 2 == 0 {
                format!("chunk-{i:05}")
            } else {
                format!("vchunk-{i:05}")
            },
            similarity: 1.0 - i as f64 / len as f64,
        })
        .collect();
    (keyword, vector)
}

fn bench_fusion(c: &mut Criterion) {
    let weights = FusionWeights {
        k: 60.0,
        keyword_weight: 1.2,
        vector_weight: 1.0,
    };

    for len in [60usize, 600] {
        let (keyword, vector) = make_lists(len);
        c.bench_function(&format!("rrf_fuse_{len}"), |b| {
            b.iter(|| {
                fuse(
                    black_box(&keyword),
                    black_box(&vector),
                    weights,
                    black_box(60),
                )
            })
        });
    }
}

criterion_group!(benches, bench_fusion);
criterion_main!(benches);

//! Property tests: fence parity, parent/child referential integrity,
//! span containment, index monotonicity.

use proptest::prelude::*;

use quarry_chunking::scanner::fence_marker_count;
use quarry_chunking::ChunkBuilder;
use quarry_core::config::ChunkingConfig;
use quarry_core::models::ChunkType;

/// One markdown-ish block of a generated document.
#[derive(Debug, Clone)]
enum Block {
    Heading(u8, String),
    Paragraph(String),
    Code(String),
}

fn word() -> impl Strategy<Value = String> {
    "[a-z]{2,10}"
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        (1u8..=4, word()).prop_map(|(level, text)| Block::Heading(level, text)),
        prop::collection::vec(word(), 5..120)
            .prop_map(|words| Block::Paragraph(words.join(" "))),
        prop::collection::vec(word(), 1..60)
            .prop_map(|lines| Block::Code(lines.join("\n"))),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 1..20).prop_map(|blocks| {
        blocks
            .iter()
            .map(|b| match b {
                Block::Heading(level, text) => {
                    format!("{} {text}", "#".repeat(*level as usize))
                }
                Block::Paragraph(text) => text.clone(),
                Block::Code(body) => format!("```\n{body}\n```"),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}

fn build(text: &str) -> Vec<quarry_core::models::Chunk> {
    let builder = ChunkBuilder::new(ChunkingConfig {
        parent_target_chars: 600,
        child_target_chars: 150,
        child_overlap_chars: 40,
        preview_chars: 200,
    });
    builder.build("doc-prop", text)
}

proptest! {
    #[test]
    fn prop_fence_parity_is_even(text in document()) {
        for chunk in build(&text) {
            prop_assert_eq!(
                fence_marker_count(&chunk.content) % 2,
                0,
                "chunk {} has an unterminated fence",
                chunk.chunk_index
            );
        }
    }

    #[test]
    fn prop_children_resolve_to_parents(text in document()) {
        let chunks = build(&text);
        for chunk in &chunks {
            if let Some(parent_id) = &chunk.parent_id {
                let parent = chunks.iter().find(|c| &c.id == parent_id);
                prop_assert!(parent.is_some(), "dangling parent_id");
                let parent = parent.unwrap();
                prop_assert_eq!(parent.chunk_type, ChunkType::Parent);
                prop_assert_eq!(&parent.document_id, &chunk.document_id);
            } else {
                prop_assert_eq!(chunk.chunk_type, ChunkType::Parent);
            }
        }
    }

    #[test]
    fn prop_child_spans_inside_parent(text in document()) {
        let chunks = build(&text);
        for chunk in &chunks {
            if let Some(parent_id) = &chunk.parent_id {
                let parent = chunks.iter().find(|c| &c.id == parent_id).unwrap();
                prop_assert!(
                    parent.content.contains(chunk.content.as_str()),
                    "child {} is not a slice of its parent",
                    chunk.chunk_index
                );
            }
        }
    }

    #[test]
    fn prop_indices_monotonic_and_unique(text in document()) {
        let chunks = build(&text);
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.chunk_index, i as u32);
        }
    }

    #[test]
    fn prop_nonempty_chunks(text in document()) {
        for chunk in build(&text) {
            prop_assert!(!chunk.content.trim().is_empty());
            prop_assert!(chunk.token_count > 0);
        }
    }
}

//! Property tests: insert→get roundtrip, bulk ops consistency.

use proptest::prelude::*;

use quarry_core::models::{Chunk, ChunkType, Document};
use quarry_core::traits::{IChunkStore, IDocumentStore};
use quarry_core::DocumentStatus;
use quarry_storage::StorageEngine;

fn make_document(id: &str) -> Document {
    Document {
        id: id.to_string(),
        title: "prop test".to_string(),
        category: String::new(),
        size_bytes: 0,
        uploaded_at: chrono::Utc::now(),
        status: DocumentStatus::Processing,
        preview: String::new(),
    }
}

fn make_chunk_with_content(doc_id: &str, index: u32, content: &str) -> Chunk {
    Chunk {
        id: uuid::Uuid::new_v4().to_string(),
        document_id: doc_id.to_string(),
        chunk_index: index,
        chunk_type: ChunkType::Child,
        content: content.to_string(),
        token_count: quarry_core::tokens::estimate(content),
        parent_id: None,
        embedding: None,
    }
}

proptest! {
    #[test]
    fn prop_insert_get_roundtrip(
        content in "[a-zA-Z0-9 ]{1,200}"
    ) {
        let engine = StorageEngine::open_in_memory().unwrap();
        engine.create_document(&make_document("doc-p")).unwrap();
        let chunk = make_chunk_with_content("doc-p", 0, &content);

        engine.insert_chunks(std::slice::from_ref(&chunk)).unwrap();
        let retrieved = engine.get_chunk(&chunk.id).unwrap().unwrap();

        prop_assert_eq!(&retrieved.id, &chunk.id);
        prop_assert_eq!(&retrieved.content, &content);
        prop_assert_eq!(retrieved.chunk_type, ChunkType::Child);
    }

    #[test]
    fn prop_bulk_insert_consistency(
        count in 1usize..30
    ) {
        let engine = StorageEngine::open_in_memory().unwrap();
        engine.create_document(&make_document("doc-p")).unwrap();
        let chunks: Vec<Chunk> = (0..count)
            .map(|i| make_chunk_with_content("doc-p", i as u32, &format!("bulk {i}")))
            .collect();

        let inserted = engine.insert_chunks(&chunks).unwrap();
        prop_assert_eq!(inserted, count);

        let loaded = engine.chunks_for_document("doc-p").unwrap();
        prop_assert_eq!(loaded.len(), count);
    }

    #[test]
    fn prop_embedding_roundtrip(
        values in prop::collection::vec(-1.0f32..1.0, 4..64)
    ) {
        let engine = StorageEngine::open_in_memory().unwrap();
        engine.create_document(&make_document("doc-p")).unwrap();
        let chunk = make_chunk_with_content("doc-p", 0, "embedded chunk");
        engine.insert_chunks(std::slice::from_ref(&chunk)).unwrap();

        engine.write_embeddings(&[(chunk.id.clone(), values.clone())]).unwrap();
        let retrieved = engine.get_chunk(&chunk.id).unwrap().unwrap();
        prop_assert_eq!(retrieved.embedding, Some(values));
    }
}

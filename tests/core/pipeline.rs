//! End-to-end pipeline tests
//!
//! Builds run against form-feed text files and the hash embedder,
//! then the written artifact set is opened and checked.

use crate::common::{
    assert_valid_stats, build_index, test_pipeline, HashEmbedder, TestCorpus, CORRUPT_MARKER,
};
use pdfvec::core::error::PdfVecError;
use pdfvec::core::storage::ArtifactSet;
use std::sync::Arc;

#[tokio::test]
async fn test_build_writes_consistent_artifacts() {
    let corpus = TestCorpus::regulatory();
    let stats = build_index(&corpus.config()).await;

    assert_valid_stats(&stats);
    assert_eq!(stats.documents_found, 4);
    assert_eq!(stats.documents_indexed, 4);

    let set = ArtifactSet::open(corpus.output_dir()).unwrap();
    assert_eq!(set.len(), stats.chunks_created);
    assert_eq!(set.metadata.len(), stats.chunks_created);
    assert_eq!(set.index.len(), stats.chunks_created);
    assert_eq!(set.manifest.document_count, 4);
    assert_eq!(set.manifest.provider, "hash:test");
}

#[tokio::test]
async fn test_chunks_ordered_by_directory_file_and_page() {
    let corpus = TestCorpus::regulatory();
    build_index(&corpus.config()).await;
    let set = ArtifactSet::open(corpus.output_dir()).unwrap();

    let mut order: Vec<(String, String)> = Vec::new();
    for record in &set.metadata {
        let key = (record.category.clone(), record.source.clone());
        if order.last() != Some(&key) {
            assert!(!order.contains(&key), "document {key:?} is not contiguous");
            order.push(key);
        }
    }
    let expected: Vec<(String, String)> = [
        ("oss_documents", "a_readme.pdf"),
        ("oss_documents", "b_license.pdf"),
        ("edpb_documents", "guidelines.pdf"),
        ("gdpr_documents", "regulation.pdf"),
    ]
    .iter()
    .map(|(c, s)| (c.to_string(), s.to_string()))
    .collect();
    assert_eq!(order, expected);

    for pair in set.metadata.windows(2) {
        if pair[0].source == pair[1].source {
            assert!(pair[0].page <= pair[1].page);
        }
    }

    let guideline_pages: Vec<u32> = set
        .metadata
        .iter()
        .filter(|m| m.source == "guidelines.pdf")
        .map(|m| m.page)
        .collect();
    assert!(guideline_pages.contains(&1));
    assert!(guideline_pages.contains(&3));
    assert!(!guideline_pages.contains(&2), "empty page must not produce chunks");
}

#[tokio::test]
async fn test_vector_ids_match_chunk_ordinals() {
    let corpus = TestCorpus::regulatory();
    build_index(&corpus.config()).await;
    let set = ArtifactSet::open(corpus.output_dir()).unwrap();

    for (ordinal, text) in set.chunks.iter().enumerate() {
        assert_eq!(
            set.index.vector(ordinal as i64).unwrap(),
            HashEmbedder::vector_for(text).as_slice(),
            "vector {ordinal} does not belong to its chunk"
        );
    }
}

#[tokio::test]
async fn test_search_finds_chunk_by_its_own_vector() {
    let corpus = TestCorpus::regulatory();
    build_index(&corpus.config()).await;
    let set = ArtifactSet::open(corpus.output_dir()).unwrap();

    let query = HashEmbedder::vector_for(&set.chunks[2]);
    let hits = set.search(&query, 3).unwrap();

    assert_eq!(hits[0].ordinal, 2);
    assert_eq!(hits[0].distance, 0.0);
    assert_eq!(hits[0].text, set.chunks[2]);
    assert_eq!(hits.len(), 3);
}

#[tokio::test]
async fn test_rebuild_is_deterministic() {
    let corpus = TestCorpus::regulatory();
    let mut first = corpus.config();
    first.output.output_dir = corpus.dir.path().join("run1");
    let mut second = corpus.config();
    second.output.output_dir = corpus.dir.path().join("run2");

    build_index(&first).await;
    build_index(&second).await;

    let a = ArtifactSet::open(&first.output.output_dir).unwrap();
    let b = ArtifactSet::open(&second.output.output_dir).unwrap();
    assert_eq!(a.chunks, b.chunks);
    assert_eq!(a.metadata, b.metadata);
    assert_eq!(a.index, b.index);
    assert_eq!(a.manifest.checksums, b.manifest.checksums);
}

#[tokio::test]
async fn test_corrupt_document_is_skipped() {
    let corpus = TestCorpus::regulatory().with_document(
        "gdpr_documents",
        "broken.pdf",
        &[CORRUPT_MARKER],
    );

    let stats = build_index(&corpus.config()).await;

    assert_eq!(stats.documents_found, 5);
    assert_eq!(stats.documents_skipped, 1);
    assert_eq!(stats.documents_indexed, 4);
    let set = ArtifactSet::open(corpus.output_dir()).unwrap();
    assert!(set.metadata.iter().all(|m| m.source != "broken.pdf"));
}

#[tokio::test]
async fn test_textless_document_contributes_no_chunks() {
    let baseline = TestCorpus::regulatory();
    let with_scan = TestCorpus::regulatory().with_document("edpb_documents", "scan.pdf", &["", "  \n\n "]);

    let base_stats = build_index(&baseline.config()).await;
    let scan_stats = build_index(&with_scan.config()).await;

    assert_eq!(scan_stats.documents_found, base_stats.documents_found + 1);
    assert_eq!(scan_stats.documents_indexed, base_stats.documents_indexed);
    assert_eq!(scan_stats.documents_skipped, 0);
    assert_eq!(scan_stats.chunks_created, base_stats.chunks_created);
}

#[tokio::test]
async fn test_empty_corpus_aborts_before_embedding() {
    let corpus = TestCorpus::new()
        .with_document("oss_documents", "blank.pdf", &["", " "])
        .with_document("gdpr_documents", "broken.pdf", &[CORRUPT_MARKER]);
    let config = corpus.config();
    let provider = Arc::new(HashEmbedder::new());

    let err = test_pipeline(&config, provider.clone()).run().await.unwrap_err();

    assert!(matches!(err, PdfVecError::EmptyCorpus));
    assert_eq!(provider.call_count(), 0);
    assert!(!corpus.output_dir().exists());
}

#[tokio::test]
async fn test_embedding_failure_keeps_previous_artifacts() {
    let corpus = TestCorpus::regulatory();
    let config = corpus.config();
    let first = build_index(&config).await;

    let provider = Arc::new(HashEmbedder::failing_on(1));
    let err = test_pipeline(&config, provider).run().await.unwrap_err();

    assert!(matches!(err, PdfVecError::Embedding(_)));
    let set = ArtifactSet::open(corpus.output_dir()).unwrap();
    assert_eq!(set.len(), first.chunks_created);
}

#[tokio::test]
async fn test_embedding_failure_on_fresh_output_writes_nothing() {
    let corpus = TestCorpus::regulatory();
    let provider = Arc::new(HashEmbedder::failing_on(0));

    let result = test_pipeline(&corpus.config(), provider).run().await;

    assert!(result.is_err());
    assert!(!corpus.output_dir().exists());
}

#[tokio::test]
async fn test_missing_source_directory_is_created() {
    let corpus = TestCorpus::new()
        .with_document("oss_documents", "a.pdf", &["Open source licences matter."])
        .with_missing_category("gdpr_documents");

    let stats = build_index(&corpus.config()).await;

    assert_eq!(stats.documents_indexed, 1);
    assert!(corpus.dir.path().join("gdpr_documents").is_dir());
}

#[test]
fn test_prepare_assigns_sequential_ordinals() {
    let corpus = TestCorpus::regulatory();
    let pipeline = test_pipeline(&corpus.config(), Arc::new(HashEmbedder::new()));

    let prepared = pipeline.prepare().unwrap();

    for (i, chunk) in prepared.chunks.iter().enumerate() {
        assert_eq!(chunk.ordinal, i as u64);
        assert_eq!(chunk.page, prepared.metadata[i].page);
        assert!(chunk.source_path.ends_with(&prepared.metadata[i].source));
    }
}

//! Artifact set persistence tests

use crate::common::{build_index, TestCorpus};
use pdfvec::core::error::PdfVecError;
use pdfvec::core::storage::manifest::{sha256_file, Manifest, METADATA_FILE};
use pdfvec::core::storage::records::write_metadata;
use pdfvec::core::storage::ArtifactSet;
use std::fs;

#[tokio::test]
async fn test_reopened_index_gives_identical_results() {
    let corpus = TestCorpus::regulatory();
    build_index(&corpus.config()).await;

    let first = ArtifactSet::open(corpus.output_dir()).unwrap();
    let second = ArtifactSet::open(corpus.output_dir()).unwrap();

    let query = first.index.vector(1).unwrap().to_vec();
    assert_eq!(
        first.index.search(&query, 5).unwrap(),
        second.index.search(&query, 5).unwrap()
    );
    assert_eq!(first.index.ids(), second.index.ids());
}

#[tokio::test]
async fn test_rebuild_replaces_artifacts_atomically() {
    let corpus = TestCorpus::regulatory();
    let config = corpus.config();
    let first = build_index(&config).await;

    let grown = corpus.with_document(
        "gdpr_documents",
        "recitals.pdf",
        &["Recital one explains scope. Recital two explains territorial application."],
    );
    let second = build_index(&grown.config()).await;

    assert!(second.chunks_created > first.chunks_created);
    let set = ArtifactSet::open(grown.output_dir()).unwrap();
    assert_eq!(set.len(), second.chunks_created);

    let names: Vec<String> = fs::read_dir(grown.dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        names.iter().all(|n| !n.starts_with('.')),
        "staging or backup directory left behind: {names:?}"
    );
}

#[tokio::test]
async fn test_count_disagreement_is_rejected() {
    let corpus = TestCorpus::regulatory();
    build_index(&corpus.config()).await;
    let out = corpus.output_dir();

    // Drop one metadata record and re-sign it so only the counts disagree
    let mut set = ArtifactSet::open(&out).unwrap();
    set.metadata.pop();
    let mut buf = Vec::new();
    write_metadata(&mut buf, &set.metadata).unwrap();
    fs::write(out.join(METADATA_FILE), buf).unwrap();

    let mut manifest = Manifest::load(&out).unwrap();
    manifest.checksums.metadata = sha256_file(&out.join(METADATA_FILE)).unwrap();
    manifest.save(&out).unwrap();

    let err = ArtifactSet::open(&out).unwrap_err();
    assert!(matches!(err, PdfVecError::InvalidArtifacts(_)));
}

#[tokio::test]
async fn test_manifest_records_run_parameters() {
    let corpus = TestCorpus::regulatory();
    let config = corpus.config();
    let stats = build_index(&config).await;

    let manifest = Manifest::load(&corpus.output_dir()).unwrap();

    assert_eq!(manifest.chunk_count as usize, stats.chunks_created);
    assert_eq!(manifest.dimension, stats.dimension);
    assert_eq!(manifest.chunking, config.chunking);
    assert_eq!(manifest.checksums.index.len(), 64);
}

#[test]
fn test_open_missing_directory() {
    let temp = tempfile::tempdir().unwrap();
    let err = ArtifactSet::open(temp.path().join("nope")).unwrap_err();
    assert!(matches!(err, PdfVecError::InvalidArtifacts(_)));
}

//! Tests for the build command
//!
//! A successful build needs a real tokenizer and embedding service,
//! so these tests cover the paths that fail before any network call.

use crate::common::TestCorpus;
use pdfvec::cli::commands::build::{execute, BuildArgs};
use pdfvec::cli::OutputFormat;

#[tokio::test]
async fn test_build_without_tokenizer_fails_cleanly() {
    let corpus = TestCorpus::regulatory();
    let mut config = corpus.config();
    config.embedding.tokenizer_file = corpus.dir.path().join("missing-tokenizer.json");

    let args = BuildArgs {
        quiet: true,
        ..BuildArgs::default()
    };
    let result = execute(args, config, OutputFormat::Json).await;

    let err = result.expect_err("build must fail without a tokenizer");
    assert!(err.to_string().contains("tokenizer"));
    assert!(!corpus.output_dir().exists());
}

#[tokio::test]
async fn test_build_rejects_invalid_overrides() {
    let corpus = TestCorpus::regulatory();

    let args = BuildArgs {
        chunk_tokens: Some(10),
        overlap_tokens: Some(10),
        quiet: true,
        ..BuildArgs::default()
    };
    let result = execute(args, corpus.config(), OutputFormat::Human).await;

    let err = result.expect_err("overlap equal to chunk limit must be rejected");
    assert!(err.to_string().contains("Overlap"));
}

#[tokio::test]
async fn test_build_rejects_zero_batch_size() {
    let corpus = TestCorpus::regulatory();

    let args = BuildArgs {
        batch_size: Some(0),
        quiet: true,
        ..BuildArgs::default()
    };
    let result = execute(args, corpus.config(), OutputFormat::Human).await;

    assert!(result.is_err());
}

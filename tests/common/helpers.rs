// Test helper functions

use async_trait::async_trait;
use pdfvec::core::config::Config;
use pdfvec::core::embedding::EmbeddingProvider;
use pdfvec::core::error::{PdfVecError, Result};
use pdfvec::core::indexer::{IndexingPipeline, TextExtractor};
use pdfvec::core::types::IndexStats;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::fixtures::FormFeedPages;

/// Dimension of [`HashEmbedder`] vectors
#[allow(dead_code)] // Used in integration tests
pub const HASH_DIM: usize = 8;

/// Deterministic provider: whitespace tokens, FNV-derived vectors
///
/// The vector depends only on the text, so tests can recompute the
/// expected vector for any chunk.
#[allow(dead_code)] // Used in integration tests
pub struct HashEmbedder {
    pub calls: AtomicUsize,
    fail_on_call: Option<usize>,
}

#[allow(dead_code)] // Used in integration tests
impl HashEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on_call: None,
        }
    }

    /// Fail with an embedding error on the given (0-based) call
    pub fn failing_on(call: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on_call: Some(call),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector_for(text: &str) -> Vec<f32> {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in text.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (0..HASH_DIM)
            .map(|j| ((hash >> (j * 8)) & 0xff) as f32 / 255.0)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> String {
        "hash:test".to_string()
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    async fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_call == Some(call) {
            return Err(PdfVecError::Embedding("service unavailable".to_string()));
        }
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(HASH_DIM)
    }
}

/// Whitespace token counter matching [`HashEmbedder::tokenize`]
#[allow(dead_code)] // Used in integration tests
pub fn words(text: &str) -> Result<usize> {
    Ok(text.split_whitespace().count())
}

/// Pipeline over form-feed text files and the given provider
#[allow(dead_code)] // Used in integration tests
pub fn test_pipeline(config: &Config, provider: Arc<HashEmbedder>) -> IndexingPipeline {
    IndexingPipeline::new(
        config,
        TextExtractor::new(Arc::new(FormFeedPages)),
        provider,
    )
    .expect("Failed to create pipeline")
}

/// Run a full build with a fresh [`HashEmbedder`]
#[allow(dead_code)] // Used in integration tests
pub async fn build_index(config: &Config) -> IndexStats {
    test_pipeline(config, Arc::new(HashEmbedder::new()))
        .run()
        .await
        .expect("Build should succeed")
}

/// Assert that build stats are consistent
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_stats(stats: &IndexStats) {
    assert!(
        stats.documents_indexed > 0,
        "Expected documents_indexed > 0, got {}",
        stats.documents_indexed
    );
    assert!(
        stats.chunks_created >= stats.documents_indexed,
        "Expected chunks_created ({}) >= documents_indexed ({})",
        stats.chunks_created,
        stats.documents_indexed
    );
    assert!(
        stats.documents_indexed + stats.documents_skipped <= stats.documents_found,
        "Indexed ({}) plus skipped ({}) exceeds found ({})",
        stats.documents_indexed,
        stats.documents_skipped,
        stats.documents_found
    );
    assert_eq!(stats.dimension, HASH_DIM);
}

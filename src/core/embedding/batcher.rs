//! Ordered batch embedding of the chunk sequence.

use std::sync::Arc;

use crate::core::embedding::provider::EmbeddingProvider;
use crate::core::error::{PdfVecError, Result};

/// Row-major `rows x dimension` matrix of f32 vectors
#[derive(Debug, Clone, PartialEq)]
pub struct Embeddings {
    dimension: usize,
    data: Vec<f32>,
}

impl Embeddings {
    /// Wrap a flat buffer, checking that it holds whole rows
    pub fn from_flat(dimension: usize, data: Vec<f32>) -> Result<Self> {
        if dimension == 0 {
            return Err(PdfVecError::Embedding("Embedding dimension is zero".to_string()));
        }
        if data.len() % dimension != 0 {
            return Err(PdfVecError::DimensionMismatch {
                expected: dimension,
                actual: data.len() % dimension,
            });
        }
        Ok(Self { dimension, data })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Vector at position `i`
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dimension..(i + 1) * self.dimension]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dimension)
    }

    pub fn into_flat(self) -> Vec<f32> {
        self.data
    }
}

/// Splits texts into fixed-size batches and embeds them in order
pub struct EmbeddingBatcher {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl EmbeddingBatcher {
    /// # Panics
    ///
    /// Panics if `batch_size` is 0.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be > 0");
        Self {
            provider,
            batch_size,
        }
    }

    /// Embed every text, preserving input order
    ///
    /// Batches are sent one after another, so output row `i` always
    /// belongs to input `i`. Any provider failure, a wrong vector count
    /// or a vector of a different dimension aborts the whole call.
    pub async fn embed_all(&self, texts: &[String]) -> Result<Embeddings> {
        if texts.is_empty() {
            return Err(PdfVecError::EmptyCorpus);
        }

        let total_batches = texts.len().div_ceil(self.batch_size);
        let mut dimension = self.provider.dimensions();
        let mut data: Vec<f32> = Vec::new();

        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            let inputs: Vec<&str> = batch.iter().map(String::as_str).collect();
            let vectors = self.provider.encode(&inputs).await?;

            if vectors.len() != batch.len() {
                return Err(PdfVecError::Embedding(format!(
                    "Provider returned {} vectors for a batch of {}",
                    vectors.len(),
                    batch.len()
                )));
            }

            for vector in vectors {
                let expected = *dimension.get_or_insert(vector.len());
                if vector.len() != expected {
                    return Err(PdfVecError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    });
                }
                data.extend(vector);
            }

            tracing::info!(
                "Embedded batch {}/{} ({} chunks)",
                batch_index + 1,
                total_batches,
                batch.len()
            );
        }

        Embeddings::from_flat(dimension.unwrap_or(0), data)
    }
}

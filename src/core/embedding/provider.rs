//! Embedding provider capability and factory.

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::config::{EmbeddingConfig, ProviderKind};
use crate::core::embedding::ollama::OllamaProvider;
use crate::core::embedding::openai::OpenAiProvider;
use crate::core::embedding::tokenizer::{HfTokenizer, TextTokenizer};
use crate::core::error::Result;

/// A tokenizer/model pair that turns text into fixed-dimension vectors
///
/// `tokenize` must use the tokenizer of the model behind `encode`,
/// otherwise chunk token limits do not match what the model sees.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short human-readable identifier ("ollama:bge-large")
    fn name(&self) -> String;

    /// Ordered tokens of `text`
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Number of tokens in `text`
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(self.tokenize(text)?.len())
    }

    /// One vector per input text, in input order
    async fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Output dimension, when known before the first call
    fn dimensions(&self) -> Option<usize>;
}

/// Build the provider selected by configuration
pub fn build_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let tokenizer: Arc<dyn TextTokenizer> = Arc::new(HfTokenizer::from_file(&config.tokenizer_file)?);

    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(config, tokenizer)?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::from_env(config, tokenizer)?),
    };

    tracing::info!("Embedding provider: {}", provider.name());
    Ok(provider)
}

//! Local embedding model served by Ollama.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::EmbeddingConfig;
use crate::core::embedding::provider::EmbeddingProvider;
use crate::core::embedding::tokenizer::TextTokenizer;
use crate::core::error::{PdfVecError, Result};

/// Provider backed by a local Ollama instance
pub struct OllamaProvider {
    client: Client,
    url: String,
    model: String,
    dimensions: Option<usize>,
    tokenizer: Arc<dyn TextTokenizer>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig, tokenizer: Arc<dyn TextTokenizer>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PdfVecError::Embedding(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.resolved_base_url().trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            tokenizer,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn name(&self) -> String {
        format!("ollama:{}", self.model)
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        self.tokenizer.tokenize(text)
    }

    async fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/api/embed", self.url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PdfVecError::Embedding(format!("Ollama {status}: {body}")));
        }

        let parsed: EmbedResponse = response.json().await?;
        Ok(parsed.embeddings)
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

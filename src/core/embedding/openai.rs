//! Remote OpenAI-compatible embeddings endpoint.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::EmbeddingConfig;
use crate::core::embedding::provider::EmbeddingProvider;
use crate::core::embedding::tokenizer::TextTokenizer;
use crate::core::error::{PdfVecError, Result};

/// Provider that calls `POST {base_url}/embeddings`
pub struct OpenAiProvider {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
    tokenizer: Arc<dyn TextTokenizer>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
    index: usize,
}

impl OpenAiProvider {
    /// Build a provider, reading the key from `config.api_key_env`
    pub fn from_env(config: &EmbeddingConfig, tokenizer: Arc<dyn TextTokenizer>) -> Result<Self> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            PdfVecError::Config(format!(
                "Environment variable {} must hold the embeddings API key",
                config.api_key_env
            ))
        })?;
        Self::new(config, &api_key, tokenizer)
    }

    pub fn new(
        config: &EmbeddingConfig,
        api_key: &str,
        tokenizer: Arc<dyn TextTokenizer>,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(PdfVecError::Config("Embeddings API key is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| PdfVecError::Config("Embeddings API key is not a valid header".to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| PdfVecError::Embedding(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.resolved_base_url().trim_end_matches('/')),
            model: config.model.clone(),
            dimensions: config.dimensions,
            tokenizer,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> String {
        format!("openai:{}", self.model)
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
            dimensions: self.dimensions,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PdfVecError::Embedding(format!("OpenAI {status}: {body}")));
        }

        let mut parsed: EmbedResponse = response.json().await?;

        // the API does not promise response order
        parsed.data.sort_by_key(|item| item.index);

        Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

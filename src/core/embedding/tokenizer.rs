//! Tokenizer shared by chunk accounting and the embedding model.

use std::path::Path;

use crate::core::error::{PdfVecError, Result};

/// Splits text into the tokens an embedding model sees
pub trait TextTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

/// HuggingFace `tokenizer.json` loaded through the `tokenizers` crate
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    /// Load a tokenizer definition from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            PdfVecError::Config(format!("Failed to load tokenizer {path:?}: {e}"))
        })?;
        tracing::debug!("Loaded tokenizer from {:?}", path);
        Ok(Self { inner })
    }
}

impl TextTokenizer for HfTokenizer {
    /// Tokens without special tokens, so counts reflect the text only
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| PdfVecError::Embedding(format!("Tokenization failed: {e}")))?;
        Ok(encoding.get_tokens().to_vec())
    }
}

//! Embedding provider capability and ordered batch embedding.
//!
//! - **provider**: `EmbeddingProvider` trait (`tokenize` + `encode`)
//!   and the configuration-driven factory
//! - **tokenizer**: HuggingFace tokenizer shared by chunking and
//!   embedding
//! - **ollama** / **openai**: local and remote provider variants
//! - **batcher**: fixed-size, order-preserving batching

pub mod batcher;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod tokenizer;

pub use batcher::{EmbeddingBatcher, Embeddings};
pub use provider::{build_provider, EmbeddingProvider};
pub use tokenizer::{HfTokenizer, TextTokenizer};

//! Configuration management for the pdfvec index builder.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{PdfVecError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which source directories are scanned and what is picked up
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Directories holding the PDF files; each name becomes a category
    #[serde(default = "default_source_dirs")]
    pub source_dirs: Vec<PathBuf>,

    /// File name patterns to include (glob syntax, case-insensitive)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// Patterns to exclude (glob syntax)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Create source directories that do not exist yet
    #[serde(default = "default_true")]
    pub create_missing_dirs: bool,
}

/// Token budgets for the sentence packer
///
/// Immutable once handed to the chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Maximum tokens per chunk (single oversized sentences excepted)
    #[serde(default = "default_chunk_token_limit")]
    pub chunk_token_limit: usize,

    /// Maximum tokens carried over from the previous chunk
    #[serde(default = "default_overlap_token_limit")]
    pub overlap_token_limit: usize,
}

/// Embedding provider variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local model served by Ollama
    Ollama,
    /// Remote OpenAI-compatible embeddings endpoint
    OpenAi,
}

impl ProviderKind {
    /// Base URL used when none is configured
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "http://localhost:11434",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = PdfVecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(PdfVecError::Config(format!(
                "Unknown embedding provider '{other}' (expected 'ollama' or 'openai')"
            ))),
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Model identifier understood by the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Provider endpoint; falls back to the provider default
    #[serde(default)]
    pub base_url: Option<String>,

    /// HuggingFace tokenizer.json paired with the model
    #[serde(default = "default_tokenizer_file")]
    pub tokenizer_file: PathBuf,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Requested output dimension (remote providers only)
    #[serde(default)]
    pub dimensions: Option<usize>,

    /// Chunks per provider call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// HTTP timeout per batch in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    /// Configured base URL or the provider default
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Extract documents on a thread pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Worker threads (0 = one per core)
    #[serde(default)]
    pub threads: usize,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory receiving the index, chunk and metadata artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

// Default value functions
fn default_source_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("oss_documents"),
        PathBuf::from("edpb_documents"),
        PathBuf::from("gdpr_documents"),
    ]
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.pdf".to_string()]
}

fn default_max_file_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_chunk_token_limit() -> usize {
    120
}

fn default_overlap_token_limit() -> usize {
    25
}

fn default_provider() -> ProviderKind {
    ProviderKind::Ollama
}

fn default_model() -> String {
    "bge-large".to_string()
}

fn default_tokenizer_file() -> PathBuf {
    PathBuf::from("tokenizer.json")
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_batch_size() -> usize {
    32
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("vector_db")
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source_dirs: default_source_dirs(),
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
            max_file_size_mb: default_max_file_size(),
            create_missing_dirs: true,
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_token_limit: default_chunk_token_limit(),
            overlap_token_limit: default_overlap_token_limit(),
        }
    }
}

impl ChunkingConfig {
    /// Create a chunking configuration, rejecting unusable budgets
    pub fn new(chunk_token_limit: usize, overlap_token_limit: usize) -> Result<Self> {
        let config = Self {
            chunk_token_limit,
            overlap_token_limit,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the token budgets
    pub fn validate(&self) -> Result<()> {
        if self.chunk_token_limit == 0 {
            return Err(PdfVecError::Config(
                "Chunk token limit must be non-zero".to_string(),
            ));
        }
        if self.overlap_token_limit >= self.chunk_token_limit {
            return Err(PdfVecError::Config(
                "Overlap token limit must be less than chunk token limit".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            tokenizer_file: default_tokenizer_file(),
            api_key_env: default_api_key_env(),
            dimensions: None,
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PdfVecError::Config(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. PDFVEC_CONFIG env var
    /// 2. XDG config file (~/.config/pdfvec/config.toml)
    /// 3. ./pdfvec.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("PDFVEC_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("pdfvec.toml").exists() {
                Self::from_file("pdfvec.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(value) = env::var("PDFVEC_CHUNK_TOKENS") {
            if let Ok(n) = value.parse() {
                self.chunking.chunk_token_limit = n;
            }
        }
        if let Ok(value) = env::var("PDFVEC_OVERLAP_TOKENS") {
            if let Ok(n) = value.parse() {
                self.chunking.overlap_token_limit = n;
            }
        }
        if let Ok(value) = env::var("PDFVEC_BATCH_SIZE") {
            if let Ok(n) = value.parse() {
                self.embedding.batch_size = n;
            }
        }
        if let Ok(dir) = env::var("PDFVEC_OUTPUT_DIR") {
            self.output.output_dir = PathBuf::from(dir);
        }
        if let Ok(dirs) = env::var("PDFVEC_SOURCE_DIRS") {
            self.corpus.source_dirs = dirs
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                .collect();
        }
        if let Ok(provider) = env::var("PDFVEC_PROVIDER") {
            self.embedding.provider = provider.parse()?;
        }
        if let Ok(model) = env::var("PDFVEC_MODEL") {
            self.embedding.model = model;
        }
        if let Ok(url) = env::var("PDFVEC_BASE_URL") {
            self.embedding.base_url = Some(url);
        }
        if let Ok(path) = env::var("PDFVEC_TOKENIZER") {
            self.embedding.tokenizer_file = PathBuf::from(path);
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.embedding.batch_size == 0 {
            return Err(PdfVecError::Config(
                "Batch size must be non-zero".to_string(),
            ));
        }

        if self.embedding.model.trim().is_empty() {
            return Err(PdfVecError::Config(
                "Embedding model must not be empty".to_string(),
            ));
        }

        if self.corpus.source_dirs.is_empty() {
            return Err(PdfVecError::Config(
                "At least one source directory is required".to_string(),
            ));
        }

        if self.output.output_dir.as_os_str().is_empty() {
            return Err(PdfVecError::Config(
                "Output directory must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (the API key itself is never logged)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Source dirs: {:?}", self.corpus.source_dirs);
        tracing::info!(
            "  Include patterns: {} patterns",
            self.corpus.include_patterns.len()
        );
        tracing::info!("  Chunk limit: {} tokens", self.chunking.chunk_token_limit);
        tracing::info!("  Overlap limit: {} tokens", self.chunking.overlap_token_limit);
        tracing::info!(
            "  Provider: {} ({})",
            self.embedding.provider,
            self.embedding.model
        );
        tracing::info!("  Tokenizer: {:?}", self.embedding.tokenizer_file);
        tracing::info!("  Batch size: {}", self.embedding.batch_size);
        tracing::info!("  Parallel extraction: {}", self.extraction.parallel);
        tracing::info!("  Output dir: {:?}", self.output.output_dir);
    }
}

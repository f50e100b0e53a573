//! Error types and error handling for the pdfvec index builder.
//!
//! Document-level failures (`Extraction`) are recoverable: the
//! pipeline logs them, skips the document and keeps going. Every
//! other variant aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfvec operations
pub type Result<T> = std::result::Result<T, PdfVecError>;

/// Main error type for the index builder
#[derive(Error, Debug)]
pub enum PdfVecError {
    #[error("Extraction failed for {path:?}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("No chunks were produced from the corpus")]
    EmptyCorpus,

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Invalid artifact set: {0}")]
    InvalidArtifacts(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PdfVecError {
    /// Build an extraction error for a single document
    pub fn extraction(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PdfVecError::Extraction {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the run may continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PdfVecError::Extraction { .. })
    }

    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

impl From<reqwest::Error> for PdfVecError {
    fn from(err: reqwest::Error) -> Self {
        PdfVecError::Embedding(format!("HTTP request failed: {err}"))
    }
}

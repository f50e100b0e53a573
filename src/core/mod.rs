//! Core domain logic (CLI-agnostic)
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **indexer**: Collection, extraction, chunking and the pipeline
//! - **embedding**: Provider capability and ordered batching
//! - **storage**: Vector index and atomic artifact persistence

pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{PdfVecError, Result};

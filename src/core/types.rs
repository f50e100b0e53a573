//! Core data types for the pdfvec index builder.
//!
//! Documents, pages, chunks and metadata records flow through the
//! pipeline in a fixed order. A chunk's position in the global
//! output sequence is its ordinal and doubles as its vector id.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A PDF file selected for indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Path of the file on disk
    pub path: PathBuf,

    /// Display title (the file name)
    pub title: String,

    /// Name of the source directory the file came from
    pub category: String,
}

/// Cleaned text of a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based physical page number
    pub number: u32,

    /// Normalized page text (never empty)
    pub text: String,
}

/// A document after text extraction
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub source: SourceDocument,
    pub pages: Vec<Page>,
}

/// Chunk text tied to the page that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChunk {
    pub page: u32,
    pub text: String,
    pub token_count: usize,
}

/// A chunk in the global output sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the global sequence (0-based)
    pub ordinal: u64,

    /// Joined sentence text
    pub text: String,

    /// Source document path
    pub source_path: PathBuf,

    /// Page the chunk was cut from
    pub page: u32,
}

/// Positional metadata stored next to each chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Document title
    pub source: String,

    /// 1-based page number
    pub page: u32,

    /// Source directory name
    pub category: String,
}

/// Statistics from an index build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// PDF files found by the collector
    pub documents_found: usize,

    /// Documents that contributed at least one chunk
    pub documents_indexed: usize,

    /// Documents skipped because extraction failed
    pub documents_skipped: usize,

    /// Total chunks (= vectors = metadata records)
    pub chunks_created: usize,

    /// Embedding dimension
    pub dimension: usize,

    /// Time spent collecting, extracting and chunking
    pub extraction_ms: u64,

    /// Time spent in the embedding provider
    pub embedding_ms: u64,

    /// Wall time for the whole run
    pub total_ms: u64,

    /// Directory the artifacts were written to
    pub output_dir: PathBuf,
}

//! pdfvec - PDF corpus to semantic vector index
//!
//! Builds a nearest-neighbor index over a directory-organized PDF
//! corpus: page text is extracted, packed into token-bounded,
//! overlapping sentence chunks, embedded in ordered batches and
//! written as three positionally-coupled artifacts (vector index,
//! chunk text, metadata).
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - indexer (collection, extraction, chunking, pipeline)
//!   - embedding (provider capability, batching)
//!   - storage (vector index, record stores, manifest)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Properties
//!
//! - Chunk ordinal == vector id == metadata position
//! - Deterministic output for an unchanged corpus
//! - All-or-nothing artifact writes

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{PdfVecError, Result};
pub use core::indexer::IndexingPipeline;
pub use core::storage::ArtifactSet;
pub use core::types::*;

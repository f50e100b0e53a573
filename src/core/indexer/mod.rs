//! Corpus indexing module.
//!
//! Turns source directories into an ordered chunk sequence and
//! drives the build end to end:
//!
//! - File collection with pattern matching (non-recursive, sorted)
//! - Page text extraction and normalization
//! - Token-bounded sentence chunking with overlap
//! - Pipeline orchestration through embedding and persistence
//!
//! # Ordering
//!
//! Chunk ordinals follow directory order, then file name order,
//! then page order, then chunk order within a page. Parallel
//! extraction is merged back into this order before chunking.

pub mod chunker;
pub mod collector;
pub mod extractor;
pub mod pipeline;

pub use chunker::Chunker;
pub use collector::{Collection, FileCollector};
pub use extractor::{PageSource, PdfExtractSource, TextExtractor};
pub use pipeline::{IndexingPipeline, PreparedCorpus};

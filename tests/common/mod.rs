// Common test utilities and fixtures

pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{pdf_document, FormFeedPages, TestCorpus, CORRUPT_MARKER};
#[allow(unused_imports)]
pub use helpers::{
    assert_valid_stats, build_index, test_pipeline, words, HashEmbedder, HASH_DIM,
};

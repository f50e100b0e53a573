//! Vector index and artifact persistence.
//!
//! # Architecture
//!
//! - **VectorIndex / IndexBuilder**: exact L2 index keyed by chunk ordinal
//! - **records**: versioned length-prefixed chunk and metadata stores
//! - **Manifest**: run description and artifact checksums
//! - **artifacts**: atomic write and verified read of the whole set
//!
//! # Output Directory Structure
//!
//! ```text
//! {output_dir}/
//! ├── index.pvi       # vector index (ids + vectors)
//! ├── chunks.pvr      # chunk text, ordinal order
//! ├── metadata.pvr    # {source, page, category}, ordinal order
//! └── manifest.json   # written last; marks the set complete
//! ```

pub mod artifacts;
pub mod manifest;
pub mod records;
pub mod vector_index;

pub use artifacts::{persist, ArtifactSet, RunInfo, SearchHit};
pub use manifest::Manifest;
pub use vector_index::{IndexBuilder, Neighbor, VectorIndex};

//! Run manifest describing a complete artifact set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::core::config::ChunkingConfig;
use crate::core::error::{PdfVecError, Result};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const INDEX_FILE: &str = "index.pvi";
pub const CHUNKS_FILE: &str = "chunks.pvr";
pub const METADATA_FILE: &str = "metadata.pvr";

/// Manifest schema version
pub const MANIFEST_VERSION: u32 = 1;

/// SHA-256 (lower-case hex) of each artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    pub index: String,
    pub chunks: String,
    pub metadata: String,
}

/// Describes one build; its presence marks the set as complete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub chunk_count: u64,
    pub dimension: usize,
    pub document_count: usize,
    pub chunking: ChunkingConfig,
    pub provider: String,
    pub checksums: Checksums,
}

impl Manifest {
    /// Load `manifest.json` from an artifact directory
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(PdfVecError::InvalidArtifacts(format!(
                "No {MANIFEST_FILE} in {dir:?}; the artifact set is incomplete"
            )));
        }

        let contents = fs::read_to_string(&path)?;
        let manifest: Manifest = serde_json::from_str(&contents)
            .map_err(|e| PdfVecError::InvalidArtifacts(format!("Unreadable manifest: {e}")))?;

        if manifest.schema_version != MANIFEST_VERSION {
            return Err(PdfVecError::InvalidArtifacts(format!(
                "Unsupported manifest version {}",
                manifest.schema_version
            )));
        }
        Ok(manifest)
    }

    /// Write `manifest.json` into `dir`
    pub fn save(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(MANIFEST_FILE), json)?;
        Ok(())
    }
}

/// SHA-256 of a file as lower-case hex
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

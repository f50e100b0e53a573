//! Atomic write and verified read of the three coupled artifacts.
//!
//! A build writes the index, chunk store and metadata store into a
//! staging directory next to the output directory, adds the manifest
//! last and then swaps the staging directory into place. Readers go
//! through [`ArtifactSet::open`], which refuses anything without a
//! matching manifest.

use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::config::ChunkingConfig;
use crate::core::error::{PdfVecError, Result};
use crate::core::storage::manifest::{
    sha256_file, Checksums, Manifest, CHUNKS_FILE, INDEX_FILE, MANIFEST_FILE, MANIFEST_VERSION,
    METADATA_FILE,
};
use crate::core::storage::records::{read_chunks, read_metadata, write_chunks, write_metadata};
use crate::core::storage::vector_index::{Neighbor, VectorIndex};
use crate::core::types::MetadataRecord;

/// Run details recorded in the manifest
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub document_count: usize,
    pub chunking: ChunkingConfig,
    pub provider: String,
}

/// A loaded, verified artifact set
#[derive(Debug)]
pub struct ArtifactSet {
    pub manifest: Manifest,
    pub index: VectorIndex,
    pub chunks: Vec<String>,
    pub metadata: Vec<MetadataRecord>,
}

/// A search hit joined with its chunk text and metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub ordinal: u64,
    pub distance: f32,
    pub text: &'a str,
    pub metadata: &'a MetadataRecord,
}

/// Write all artifacts for one run into `output_dir`
///
/// Either the previous contents of `output_dir` or the complete new
/// set are visible at any point. On error the staging directory is
/// removed and `output_dir` is left as it was.
pub fn persist(
    output_dir: &Path,
    index: &VectorIndex,
    chunks: &[String],
    metadata: &[MetadataRecord],
    run: &RunInfo,
) -> Result<Manifest> {
    if index.len() != chunks.len() || chunks.len() != metadata.len() {
        return Err(PdfVecError::Persistence(format!(
            "Artifact lengths disagree: {} vectors, {} chunks, {} metadata records",
            index.len(),
            chunks.len(),
            metadata.len()
        )));
    }

    let (parent, name) = split_output_dir(output_dir)?;
    fs::create_dir_all(&parent).map_err(|e| persistence("create output parent", &parent, e))?;

    let staging = parent.join(format!(".{name}.staging-{}", std::process::id()));
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(|e| persistence("clear staging", &staging, e))?;
    }
    fs::create_dir(&staging).map_err(|e| persistence("create staging", &staging, e))?;

    let staged = write_staging(&staging, index, chunks, metadata, run)
        .and_then(|manifest| swap_into_place(&staging, output_dir, &parent, &name).map(|_| manifest));

    match staged {
        Ok(manifest) => {
            tracing::info!(
                "Persisted {} chunks to {:?}",
                manifest.chunk_count,
                output_dir
            );
            Ok(manifest)
        }
        Err(e) => {
            if staging.exists() {
                let _ = fs::remove_dir_all(&staging);
            }
            Err(e)
        }
    }
}

fn split_output_dir(output_dir: &Path) -> Result<(PathBuf, String)> {
    let name = output_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            PdfVecError::Persistence(format!("Output path {output_dir:?} has no directory name"))
        })?;
    let parent = match output_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((parent, name))
}

fn persistence(action: &str, path: &Path, e: impl std::fmt::Display) -> PdfVecError {
    PdfVecError::Persistence(format!("Failed to {action} {path:?}: {e}"))
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).map_err(|e| persistence("create", path, e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(|e| persistence("write", path, e))?;
    writer.flush().map_err(|e| persistence("flush", path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| persistence("sync", path, e))?;
    Ok(())
}

fn write_staging(
    staging: &Path,
    index: &VectorIndex,
    chunks: &[String],
    metadata: &[MetadataRecord],
    run: &RunInfo,
) -> Result<Manifest> {
    let index_path = staging.join(INDEX_FILE);
    let chunks_path = staging.join(CHUNKS_FILE);
    let metadata_path = staging.join(METADATA_FILE);

    write_file(&index_path, |w| index.write_to(w))?;
    write_file(&chunks_path, |w| write_chunks(w, chunks))?;
    write_file(&metadata_path, |w| write_metadata(w, metadata))?;

    let manifest = Manifest {
        schema_version: MANIFEST_VERSION,
        created_at: Utc::now(),
        chunk_count: chunks.len() as u64,
        dimension: index.dimension(),
        document_count: run.document_count,
        chunking: run.chunking,
        provider: run.provider.clone(),
        checksums: Checksums {
            index: sha256_file(&index_path)?,
            chunks: sha256_file(&chunks_path)?,
            metadata: sha256_file(&metadata_path)?,
        },
    };

    // Written last: its presence marks the set complete
    manifest
        .save(staging)
        .map_err(|e| persistence("write", &staging.join(MANIFEST_FILE), e))?;

    Ok(manifest)
}

fn swap_into_place(staging: &Path, output_dir: &Path, parent: &Path, name: &str) -> Result<()> {
    if !output_dir.exists() {
        return fs::rename(staging, output_dir)
            .map_err(|e| persistence("move staging into", output_dir, e));
    }

    let backup = parent.join(format!(".{name}.old-{}", std::process::id()));
    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(|e| persistence("clear backup", &backup, e))?;
    }

    fs::rename(output_dir, &backup).map_err(|e| persistence("move aside", output_dir, e))?;

    if let Err(e) = fs::rename(staging, output_dir) {
        restore_backup(&backup, output_dir);
        return Err(persistence("move staging into", output_dir, e));
    }

    if let Err(e) = fs::remove_dir_all(&backup) {
        tracing::warn!("Could not remove previous artifacts {:?}: {}", backup, e);
    }
    Ok(())
}

/// Move the previous set back into place; returns whether it worked
fn restore_backup(backup: &Path, output_dir: &Path) -> bool {
    match fs::rename(backup, output_dir) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(
                "Could not restore previous artifacts: they remain at {:?} instead of {:?}: {}",
                backup,
                output_dir,
                e
            );
            false
        }
    }
}

impl ArtifactSet {
    /// Load and verify an artifact directory
    ///
    /// Fails with `InvalidArtifacts` when the manifest is missing,
    /// a checksum does not match, or the three artifacts disagree on
    /// count, dimension or ids.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let manifest = Manifest::load(dir)?;

        let index_path = dir.join(INDEX_FILE);
        let chunks_path = dir.join(CHUNKS_FILE);
        let metadata_path = dir.join(METADATA_FILE);

        verify_checksum(&index_path, &manifest.checksums.index)?;
        verify_checksum(&chunks_path, &manifest.checksums.chunks)?;
        verify_checksum(&metadata_path, &manifest.checksums.metadata)?;

        let index = VectorIndex::read_from(&mut BufReader::new(File::open(&index_path)?))?;
        let chunks = read_chunks(&mut BufReader::new(File::open(&chunks_path)?))?;
        let metadata = read_metadata(&mut BufReader::new(File::open(&metadata_path)?))?;

        let expected = manifest.chunk_count as usize;
        if index.len() != expected || chunks.len() != expected || metadata.len() != expected {
            return Err(PdfVecError::InvalidArtifacts(format!(
                "Manifest lists {} chunks but found {} vectors, {} chunks, {} metadata records",
                expected,
                index.len(),
                chunks.len(),
                metadata.len()
            )));
        }

        if index.dimension() != manifest.dimension {
            return Err(PdfVecError::InvalidArtifacts(format!(
                "Manifest dimension {} does not match index dimension {}",
                manifest.dimension,
                index.dimension()
            )));
        }

        if !index.ids().iter().enumerate().all(|(i, &id)| id == i as i64) {
            return Err(PdfVecError::InvalidArtifacts(
                "Vector ids are not the chunk ordinals 0..N-1".to_string(),
            ));
        }

        tracing::debug!("Opened artifact set {:?} ({} chunks)", dir, expected);

        Ok(Self {
            manifest,
            index,
            chunks,
            metadata,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Nearest chunks to `query`, joined with their text and metadata
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<'_>>> {
        Ok(self
            .index
            .search(query, k)?
            .into_iter()
            .map(|Neighbor { id, distance }| SearchHit {
                ordinal: id as u64,
                distance,
                text: &self.chunks[id as usize],
                metadata: &self.metadata[id as usize],
            })
            .collect())
    }
}

fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    if !path.exists() {
        return Err(PdfVecError::InvalidArtifacts(format!("Missing artifact {path:?}")));
    }
    let actual = sha256_file(path)?;
    if actual != expected {
        return Err(PdfVecError::InvalidArtifacts(format!(
            "Checksum mismatch for {path:?}"
        )));
    }
    Ok(())
}

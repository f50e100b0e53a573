//! Length-prefixed record stores for chunk text and metadata.
//!
//! Both stores share one preamble: a 4-byte magic, a u32 format
//! version and a u64 record count, all little-endian. Records follow
//! in ordinal order, so record `i` belongs to vector id `i`.
//!
//! ```text
//! chunks.pvr    PVCH | version | count | (len:u32 text)*
//! metadata.pvr  PVMD | version | count | (len:u32 title, page:u32, len:u32 category)*
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::core::error::{PdfVecError, Result};
use crate::core::types::MetadataRecord;

/// Current on-disk format version for every artifact
pub const FORMAT_VERSION: u32 = 1;

pub const CHUNKS_MAGIC: &[u8; 4] = b"PVCH";
pub const METADATA_MAGIC: &[u8; 4] = b"PVMD";

/// Upper bound on records pre-allocated from an untrusted header
const MAX_PREALLOC: usize = 1 << 16;

pub(crate) fn corrupt(what: &str, e: impl std::fmt::Display) -> PdfVecError {
    PdfVecError::InvalidArtifacts(format!("{what}: {e}"))
}

/// Write magic and format version
pub(crate) fn write_preamble<W: Write>(w: &mut W, magic: &[u8; 4]) -> Result<()> {
    w.write_all(magic)?;
    w.write_u32::<LittleEndian>(FORMAT_VERSION)?;
    Ok(())
}

/// Check magic and format version
pub(crate) fn read_preamble<R: Read>(r: &mut R, magic: &[u8; 4], what: &str) -> Result<()> {
    let mut found = [0u8; 4];
    r.read_exact(&mut found).map_err(|e| corrupt(what, e))?;
    if &found != magic {
        return Err(corrupt(what, "bad magic bytes"));
    }

    let version = r
        .read_u32::<LittleEndian>()
        .map_err(|e| corrupt(what, e))?;
    if version != FORMAT_VERSION {
        return Err(corrupt(what, format!("unsupported format version {version}")));
    }
    Ok(())
}

pub(crate) fn prealloc<T>(count: u64) -> Vec<T> {
    Vec::with_capacity((count as usize).min(MAX_PREALLOC))
}

fn write_str<W: Write>(w: &mut W, s: &str) -> Result<()> {
    let len = u32::try_from(s.len())
        .map_err(|_| PdfVecError::Persistence("record longer than 4 GiB".to_string()))?;
    w.write_u32::<LittleEndian>(len)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn read_str<R: Read>(r: &mut R, what: &str) -> Result<String> {
    let len = r.read_u32::<LittleEndian>().map_err(|e| corrupt(what, e))? as u64;
    let mut bytes = Vec::new();
    let read = r
        .by_ref()
        .take(len)
        .read_to_end(&mut bytes)
        .map_err(|e| corrupt(what, e))?;
    if read as u64 != len {
        return Err(corrupt(what, "truncated record"));
    }
    String::from_utf8(bytes).map_err(|e| corrupt(what, e))
}

/// Serialize the ordered chunk texts
pub fn write_chunks<W: Write>(w: &mut W, chunks: &[String]) -> Result<()> {
    write_preamble(w, CHUNKS_MAGIC)?;
    w.write_u64::<LittleEndian>(chunks.len() as u64)?;
    for text in chunks {
        write_str(w, text)?;
    }
    Ok(())
}

/// Read the ordered chunk texts
pub fn read_chunks<R: Read>(r: &mut R) -> Result<Vec<String>> {
    read_preamble(r, CHUNKS_MAGIC, "chunk store")?;
    let count = r
        .read_u64::<LittleEndian>()
        .map_err(|e| corrupt("chunk store", e))?;

    let mut chunks = prealloc(count);
    for _ in 0..count {
        chunks.push(read_str(r, "chunk store")?);
    }
    Ok(chunks)
}

/// Serialize the ordered metadata records
pub fn write_metadata<W: Write>(w: &mut W, records: &[MetadataRecord]) -> Result<()> {
    write_preamble(w, METADATA_MAGIC)?;
    w.write_u64::<LittleEndian>(records.len() as u64)?;
    for record in records {
        write_str(w, &record.source)?;
        w.write_u32::<LittleEndian>(record.page)?;
        write_str(w, &record.category)?;
    }
    Ok(())
}

/// Read the ordered metadata records
pub fn read_metadata<R: Read>(r: &mut R) -> Result<Vec<MetadataRecord>> {
    const WHAT: &str = "metadata store";
    read_preamble(r, METADATA_MAGIC, WHAT)?;
    let count = r.read_u64::<LittleEndian>().map_err(|e| corrupt(WHAT, e))?;

    let mut records = prealloc(count);
    for _ in 0..count {
        let source = read_str(r, WHAT)?;
        let page = r.read_u32::<LittleEndian>().map_err(|e| corrupt(WHAT, e))?;
        let category = read_str(r, WHAT)?;
        records.push(MetadataRecord {
            source,
            page,
            category,
        });
    }
    Ok(records)
}

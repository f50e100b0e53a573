//! Exact L2 vector index with explicit identifiers.
//!
//! Vectors are stored flat and searched by brute force, which gives
//! exact nearest neighbors. Identifiers are supplied by the caller
//! rather than derived from insertion order.
//!
//! Serialized layout (`index.pvi`, little-endian):
//!
//! ```text
//! PVIX | version:u32 | dimension:u32 | count:u64 | ids:i64*count | vectors:f32*count*dimension
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{Read, Write};

use crate::core::embedding::Embeddings;
use crate::core::error::{PdfVecError, Result};
use crate::core::storage::records::{corrupt, prealloc, read_preamble, write_preamble};

pub const INDEX_MAGIC: &[u8; 4] = b"PVIX";

/// A search result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: i64,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Flat L2 index mapping explicit ids to vectors
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    dimension: usize,
    ids: Vec<i64>,
    vectors: Vec<f32>,
    positions: HashMap<i64, usize>,
}

impl VectorIndex {
    /// Create an empty index for vectors of `dimension` components
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 || dimension > u32::MAX as usize {
            return Err(PdfVecError::Config(format!(
                "Invalid index dimension {dimension}"
            )));
        }
        Ok(Self {
            dimension,
            ids: Vec::new(),
            vectors: Vec::new(),
            positions: HashMap::new(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers in insertion order
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Insert vectors under the given identifiers
    ///
    /// `vectors` is row-major with one row per id. Duplicate ids are
    /// rejected and leave the index unchanged.
    pub fn add_with_ids(&mut self, vectors: &[f32], ids: &[i64]) -> Result<()> {
        if vectors.len() != ids.len() * self.dimension {
            return Err(PdfVecError::DimensionMismatch {
                expected: ids.len() * self.dimension,
                actual: vectors.len(),
            });
        }

        let mut seen = std::collections::HashSet::with_capacity(ids.len());
        for id in ids {
            if self.positions.contains_key(id) || !seen.insert(*id) {
                return Err(PdfVecError::Persistence(format!(
                    "Duplicate vector id {id}"
                )));
            }
        }

        for id in ids {
            self.positions.insert(*id, self.ids.len());
            self.ids.push(*id);
        }
        self.vectors.extend_from_slice(vectors);
        Ok(())
    }

    /// Stored vector for `id`
    pub fn vector(&self, id: i64) -> Option<&[f32]> {
        self.positions
            .get(&id)
            .map(|&pos| &self.vectors[pos * self.dimension..(pos + 1) * self.dimension])
    }

    /// The `k` nearest vectors to `query`, closest first
    ///
    /// Equal distances are ordered by id.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(PdfVecError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .ids
            .iter()
            .zip(self.vectors.chunks_exact(self.dimension))
            .map(|(&id, vector)| Neighbor {
                id,
                distance: squared_l2(query, vector),
            })
            .collect();

        neighbors.sort_by(|a, b| match a.distance.total_cmp(&b.distance) {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Serialize the index
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_preamble(w, INDEX_MAGIC)?;
        w.write_u32::<LittleEndian>(self.dimension as u32)?;
        w.write_u64::<LittleEndian>(self.ids.len() as u64)?;
        for id in &self.ids {
            w.write_i64::<LittleEndian>(*id)?;
        }
        for value in &self.vectors {
            w.write_f32::<LittleEndian>(*value)?;
        }
        Ok(())
    }

    /// Deserialize an index written by [`VectorIndex::write_to`]
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        const WHAT: &str = "vector index";
        read_preamble(r, INDEX_MAGIC, WHAT)?;

        let dimension = r.read_u32::<LittleEndian>().map_err(|e| corrupt(WHAT, e))? as usize;
        let count = r.read_u64::<LittleEndian>().map_err(|e| corrupt(WHAT, e))?;
        let mut index = Self::new(dimension).map_err(|e| corrupt(WHAT, e))?;

        let mut ids: Vec<i64> = prealloc(count);
        for _ in 0..count {
            ids.push(r.read_i64::<LittleEndian>().map_err(|e| corrupt(WHAT, e))?);
        }

        let mut vectors: Vec<f32> = prealloc(count);
        let mut row = vec![0f32; dimension];
        for _ in 0..count {
            r.read_f32_into::<LittleEndian>(&mut row)
                .map_err(|e| corrupt(WHAT, e))?;
            vectors.extend_from_slice(&row);
        }

        index
            .add_with_ids(&vectors, &ids)
            .map_err(|e| corrupt(WHAT, e))?;
        Ok(index)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Builds the index for one run, using chunk ordinals as ids
pub struct IndexBuilder;

impl IndexBuilder {
    /// Index `embeddings` with ids `0..N-1` in row order
    pub fn build(embeddings: &Embeddings) -> Result<VectorIndex> {
        let mut index = VectorIndex::new(embeddings.dimension())?;
        let ids: Vec<i64> = (0..embeddings.len() as i64).collect();
        let flat: Vec<f32> = embeddings.rows().flatten().copied().collect();
        index.add_with_ids(&flat, &ids)?;

        tracing::info!(
            "Built vector index: {} vectors, dimension {}",
            index.len(),
            index.dimension()
        );
        Ok(index)
    }
}

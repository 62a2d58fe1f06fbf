//! Vector index abstraction.
//!
//! Insertion is split in two: [`PreparedBatch::new`] validates and
//! normalizes a batch without touching any index, and
//! [`VectorIndex::append`] stores it. Callers that hold a lock only need
//! it for the second step.

use crate::types::{DocumentRecord, IndexStats, SearchHit};
use crate::vector;
use semsearch_core::{AppError, AppResult};

/// A validated, unit-normalized batch ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBatch {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    records: Vec<DocumentRecord>,
}

impl PreparedBatch {
    /// Validate a batch and normalize its vectors in place.
    ///
    /// # Errors
    /// `InvalidArgument` if the vector and record counts differ, a vector is
    /// empty or contains a non-finite component, or the batch mixes
    /// dimensions. An empty batch is valid.
    pub fn new(mut vectors: Vec<Vec<f32>>, records: Vec<DocumentRecord>) -> AppResult<Self> {
        if vectors.len() != records.len() {
            return Err(AppError::InvalidArgument(format!(
                "got {} vectors but {} records",
                vectors.len(),
                records.len()
            )));
        }

        let dimension = vectors.first().map_or(0, Vec::len);
        if !vectors.is_empty() && dimension == 0 {
            return Err(AppError::InvalidArgument(
                "vectors must have at least one dimension".to_string(),
            ));
        }

        for (i, v) in vectors.iter_mut().enumerate() {
            if v.len() != dimension {
                return Err(AppError::InvalidArgument(format!(
                    "vector {} has {} dimensions but the batch started with {}",
                    i,
                    v.len(),
                    dimension
                )));
            }
            check_finite(v, i)?;
            vector::normalize(v);
        }

        Ok(Self {
            dimension,
            vectors,
            records,
        })
    }

    /// Dimension shared by every vector; 0 for an empty batch.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split into normalized vectors and their records.
    pub fn into_parts(self) -> (Vec<Vec<f32>>, Vec<DocumentRecord>) {
        (self.vectors, self.records)
    }
}

/// Reject NaN and infinite components, which would poison every score.
pub(crate) fn check_finite(v: &[f32], position: usize) -> AppResult<()> {
    if let Some(j) = v.iter().position(|x| !x.is_finite()) {
        return Err(AppError::InvalidArgument(format!(
            "vector {} has a non-finite value at component {}",
            position, j
        )));
    }
    Ok(())
}

/// Trait for vector index backends.
///
/// Implementations keep vectors and records in lockstep: after every call
/// `len()` counts both, and position `i` of one belongs to position `i` of
/// the other. A failed call leaves the index exactly as it was.
pub trait VectorIndex: Send + Sync {
    /// Append a prepared batch, establishing the dimension if none is set.
    ///
    /// Returns the number of documents added.
    fn append(&mut self, batch: PreparedBatch) -> AppResult<usize>;

    /// Search for the `top_k` stored vectors most similar to `query`.
    ///
    /// Returns hits ordered by descending cosine similarity, earlier
    /// insertions first on ties.
    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>>;

    /// Remove everything and forget the dimension.
    fn reset(&mut self);

    /// Number of stored documents.
    fn len(&self) -> usize;

    /// Established dimension, if any vector has been stored.
    fn dimension(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate, normalize and append in one step.
    fn insert(
        &mut self,
        vectors: Vec<Vec<f32>>,
        records: Vec<DocumentRecord>,
    ) -> AppResult<usize> {
        let batch = PreparedBatch::new(vectors, records)?;
        self.append(batch)
    }

    fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.len(),
            dimension: self.dimension(),
        }
    }
}

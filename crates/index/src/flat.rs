//! Flat (exhaustive) in-memory vector index.

use crate::types::{DocumentRecord, SearchHit};
use crate::vector::{self, select_top_k};
use crate::vector_index::{check_finite, PreparedBatch, VectorIndex};
use semsearch_core::{AppError, AppResult};

/// Exact cosine-similarity index over unit-normalized vectors.
///
/// Vectors live in one contiguous buffer, `dimension` floats per document,
/// so a search is a single pass of dot products. `records[i]` describes the
/// vector at `data[i * dimension..(i + 1) * dimension]`.
#[derive(Debug, Default, Clone)]
pub struct FlatIndex {
    dimension: Option<usize>,
    data: Vec<f32>,
    records: Vec<DocumentRecord>,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored records in insertion order.
    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    /// Stored (normalized) vector at `position`.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let dim = self.dimension?;
        self.data.get(position * dim..(position + 1) * dim)
    }
}

impl VectorIndex for FlatIndex {
    fn append(&mut self, batch: PreparedBatch) -> AppResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let batch_dim = batch.dimension();
        let dim = match self.dimension {
            Some(expected) if expected != batch_dim => {
                return Err(AppError::DimensionMismatch {
                    expected,
                    actual: batch_dim,
                });
            }
            Some(expected) => expected,
            None => batch_dim,
        };

        let (vectors, records) = batch.into_parts();
        let added = records.len();

        self.data.reserve(added * dim);
        for v in vectors {
            self.data.extend_from_slice(&v);
        }
        self.records.extend(records);
        self.dimension = Some(dim);

        tracing::debug!(
            "Appended {} vectors (dimension {}), index now holds {}",
            added,
            dim,
            self.records.len()
        );

        Ok(added)
    }

    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>> {
        if top_k == 0 {
            return Err(AppError::InvalidArgument(
                "top_k must be at least 1".to_string(),
            ));
        }

        let Some(dim) = self.dimension else {
            return Ok(Vec::new());
        };

        if query.len() != dim {
            return Err(AppError::DimensionMismatch {
                expected: dim,
                actual: query.len(),
            });
        }
        check_finite(query, 0)?;

        let mut query = query.to_vec();
        vector::normalize(&mut query);

        let scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(dim)
            .map(|stored| vector::dot(stored, &query))
            .enumerate()
            .collect();

        let hits: Vec<SearchHit> = select_top_k(scored, top_k)
            .into_iter()
            .map(|(position, score)| SearchHit::from_record(&self.records[position], score))
            .collect();

        tracing::debug!(
            "Scanned {} vectors, returning {} hits (requested top-{})",
            self.records.len(),
            hits.len(),
            top_k
        );

        Ok(hits)
    }

    fn reset(&mut self) {
        self.data.clear();
        self.records.clear();
        self.dimension = None;
        tracing::debug!("Reset flat index");
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

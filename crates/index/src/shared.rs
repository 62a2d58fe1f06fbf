//! Thread-safe handle around a [`VectorIndex`].

use crate::flat::FlatIndex;
use crate::types::{DocumentRecord, IndexStats, SearchHit};
use crate::vector_index::{PreparedBatch, VectorIndex};
use semsearch_core::AppResult;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable, lock-guarded index shared between request handlers.
///
/// Searches and stats take the shared lock; insert and reset take the
/// exclusive lock, so a search never sees vectors and records at different
/// lengths. Batch validation and normalization run before the exclusive
/// lock is taken.
#[derive(Debug)]
pub struct SharedIndex<I = FlatIndex> {
    inner: Arc<RwLock<I>>,
}

impl<I> Clone for SharedIndex<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedIndex<FlatIndex> {
    /// Create an empty flat index.
    pub fn new() -> Self {
        Self::from_index(FlatIndex::new())
    }
}

impl Default for SharedIndex<FlatIndex> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: VectorIndex> SharedIndex<I> {
    pub fn from_index(index: I) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Insert vectors with their records. See [`VectorIndex::insert`].
    pub fn insert(
        &self,
        vectors: Vec<Vec<f32>>,
        records: Vec<DocumentRecord>,
    ) -> AppResult<usize> {
        let batch = PreparedBatch::new(vectors, records)?;
        if batch.is_empty() {
            return Ok(0);
        }
        self.write().append(batch)
    }

    /// Search for the `top_k` most similar documents. See [`VectorIndex::search`].
    pub fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>> {
        self.read().search(query, top_k)
    }

    /// Clear the index and forget its dimension.
    pub fn reset(&self) {
        self.write().reset();
    }

    pub fn stats(&self) -> IndexStats {
        self.read().stats()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the tables at different
    // lengths (appends are validated first), so a poisoned lock is reused.
    fn read(&self) -> RwLockReadGuard<'_, I> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, I> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

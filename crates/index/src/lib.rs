//! In-memory vector index for semantic search.
//!
//! Stores unit-normalized embedding vectors next to a parallel table of
//! document records and answers exact top-k cosine similarity queries
//! with a flat scan.
//!
//! - [`FlatIndex`] is the single-threaded index.
//! - [`SharedIndex`] wraps any [`VectorIndex`] behind a reader/writer lock
//!   for concurrent insert/search/reset.
//!
//! # Example
//! ```
//! use semsearch_index::{DocumentRecord, SharedIndex};
//!
//! let index = SharedIndex::new();
//! index
//!     .insert(
//!         vec![vec![1.0, 0.0], vec![0.0, 1.0]],
//!         vec![DocumentRecord::new("a"), DocumentRecord::new("b")],
//!     )
//!     .unwrap();
//!
//! let hits = index.search(&[1.0, 0.0], 2).unwrap();
//! assert_eq!(hits[0].id, "a");
//! ```

pub mod flat;
pub mod shared;
pub mod types;
pub mod vector;
pub mod vector_index;

#[cfg(test)]
mod tests;

pub use flat::FlatIndex;
pub use shared::SharedIndex;
pub use types::{DocumentRecord, IndexStats, Metadata, SearchHit};
pub use vector_index::{PreparedBatch, VectorIndex};

/// Result count used when a caller does not ask for a specific one.
pub const DEFAULT_TOP_K: usize = 5;

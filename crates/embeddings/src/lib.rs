//! Embedding providers for semsearch.
//!
//! An embedding provider maps a batch of N strings to N vectors of one
//! fixed dimension. The index never calls a provider; the service embeds
//! text first and hands the vectors over.

pub mod provider;
pub mod providers;

pub use provider::{check_batch, create_provider, EmbeddingProvider};
pub use semsearch_core::EmbeddingConfig;

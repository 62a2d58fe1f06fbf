//! Semantic search service.
//!
//! [`SearchService`] ties an embedding provider to a shared vector index;
//! [`http`] exposes it as a small JSON API.

pub mod http;
pub mod service;

#[cfg(test)]
mod testing;

pub use http::{router, serve, serve_with_listener};
pub use service::{Document, SearchService};

//! Search service: embeds text, then stores or searches vectors.

use semsearch_core::{AppError, AppResult};
use semsearch_embeddings::{check_batch, EmbeddingProvider};
use semsearch_index::{DocumentRecord, IndexStats, Metadata, SearchHit, SharedIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// A document submitted for indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub meta: Option<Metadata>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            name: None,
            path: None,
            meta: None,
        }
    }

    /// Split into the text to embed and the record to store.
    fn into_parts(self) -> (String, DocumentRecord) {
        let record = DocumentRecord {
            id: self.id,
            name: self.name,
            path: self.path,
            meta: self.meta,
        };
        (self.text, record)
    }
}

/// Embedding provider plus the index it feeds.
///
/// Cloning is cheap and every clone shares the same index. Provider calls
/// happen before the index lock is taken.
#[derive(Debug, Clone)]
pub struct SearchService {
    provider: Arc<dyn EmbeddingProvider>,
    index: SharedIndex,
    default_top_k: usize,
}

impl SearchService {
    /// Create a service with an empty index.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, default_top_k: usize) -> Self {
        Self::with_index(provider, SharedIndex::new(), default_top_k)
    }

    pub fn with_index(
        provider: Arc<dyn EmbeddingProvider>,
        index: SharedIndex,
        default_top_k: usize,
    ) -> Self {
        Self {
            provider,
            index,
            default_top_k,
        }
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    pub fn index(&self) -> &SharedIndex {
        &self.index
    }

    /// Embed and store a batch of documents.
    ///
    /// Returns the number added. An empty batch returns 0 without calling
    /// the provider.
    pub async fn index_documents(&self, docs: Vec<Document>) -> AppResult<usize> {
        if docs.is_empty() {
            return Ok(0);
        }

        let start = Instant::now();
        let (texts, records): (Vec<String>, Vec<DocumentRecord>) =
            docs.into_iter().map(Document::into_parts).unzip();

        let vectors = self.provider.embed_batch(&texts).await?;
        check_batch(&texts, &vectors)?;

        let added = self.index.insert(vectors, records)?;

        tracing::info!(
            "Indexed {} documents in {:.2}s ({} total)",
            added,
            start.elapsed().as_secs_f64(),
            self.index.len()
        );

        Ok(added)
    }

    /// Return the documents most similar to `query`.
    ///
    /// `top_k` defaults to the configured value. An empty index returns no
    /// hits without calling the provider.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> AppResult<Vec<SearchHit>> {
        let top_k = top_k.unwrap_or(self.default_top_k);
        if top_k == 0 {
            return Err(AppError::InvalidArgument(
                "top_k must be at least 1".to_string(),
            ));
        }

        if self.index.is_empty() {
            tracing::debug!("Search on empty index");
            return Ok(Vec::new());
        }

        let embedding = self.provider.embed(query).await?;
        let hits = self.index.search(&embedding, top_k)?;

        tracing::info!(
            "Search returned {} hits (top-{}, query length {})",
            hits.len(),
            top_k,
            query.len()
        );

        Ok(hits)
    }

    /// Drop every stored document.
    pub fn clear(&self) {
        self.index.reset();
        tracing::info!("Cleared index");
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingProvider, FixedProvider, ShortProvider};
    use semsearch_embeddings::providers::TrigramProvider;

    fn fixed(entries: Vec<(&str, Vec<f32>)>) -> SearchService {
        SearchService::new(Arc::new(FixedProvider::new(entries)), 5)
    }

    #[tokio::test]
    async fn test_index_and_search_orthogonal() {
        let service = fixed(vec![("alpha", vec![1.0, 0.0]), ("beta", vec![0.0, 1.0])]);

        let added = service
            .index_documents(vec![Document::new("a", "alpha"), Document::new("b", "beta")])
            .await
            .unwrap();
        assert_eq!(added, 2);

        let hits = service.search("alpha", Some(2)).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "a");
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert_eq!(hits[1].id, "b");
        assert!(hits[1].score.abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_records_keep_document_fields() {
        let service = fixed(vec![("x", vec![1.0, 1.0])]);

        let mut meta = Metadata::new();
        meta.insert("tag".into(), serde_json::json!("guide"));
        let doc = Document {
            name: Some("X".into()),
            path: Some("/x.md".into()),
            meta: Some(meta.clone()),
            ..Document::new("doc-x", "x")
        };

        service.index_documents(vec![doc]).await.unwrap();
        let hits = service.search("x", None).await.unwrap();

        assert_eq!(hits[0].id, "doc-x");
        assert_eq!(hits[0].name.as_deref(), Some("X"));
        assert_eq!(hits[0].path.as_deref(), Some("/x.md"));
        assert_eq!(hits[0].meta, Some(meta));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_provider() {
        let service = SearchService::new(Arc::new(FailingProvider), 5);
        assert_eq!(service.index_documents(Vec::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_index_search_skips_provider() {
        let service = SearchService::new(Arc::new(FailingProvider), 5);
        assert!(service.search("anything", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_top_k_rejected() {
        let service = fixed(vec![("a", vec![1.0])]);
        let result = service.search("a", Some(0)).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let service = SearchService::new(Arc::new(FailingProvider), 5);
        let result = service
            .index_documents(vec![Document::new("a", "text")])
            .await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
        assert!(service.index().is_empty());
    }

    #[tokio::test]
    async fn test_provider_contract_violation() {
        let service = SearchService::new(Arc::new(ShortProvider), 5);
        let result = service
            .index_documents(vec![Document::new("a", "one"), Document::new("b", "two")])
            .await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
        assert!(service.index().is_empty());
    }

    #[tokio::test]
    async fn test_dimension_change_is_rejected() {
        let service = fixed(vec![("short", vec![1.0, 0.0]), ("long", vec![1.0, 0.0, 0.0])]);

        service
            .index_documents(vec![Document::new("first", "short")])
            .await
            .unwrap();

        let result = service
            .index_documents(vec![Document::new("second", "long")])
            .await;
        assert!(matches!(result, Err(AppError::DimensionMismatch { .. })));
        assert_eq!(service.stats().documents, 1);
    }

    #[tokio::test]
    async fn test_clear_then_reindex() {
        let service = fixed(vec![("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0, 0.0])]);

        service
            .index_documents(vec![Document::new("a", "a")])
            .await
            .unwrap();
        service.clear();
        service.clear();
        assert_eq!(service.stats().documents, 0);
        assert_eq!(service.stats().dimension, None);

        // New dimension accepted after clear
        service
            .index_documents(vec![Document::new("b", "b")])
            .await
            .unwrap();
        assert_eq!(service.stats().dimension, Some(3));
    }

    #[tokio::test]
    async fn test_trigram_end_to_end() {
        let service = SearchService::new(Arc::new(TrigramProvider::new(256)), 3);

        service
            .index_documents(vec![
                Document::new("rust", "Rust ownership and borrowing rules"),
                Document::new("pasta", "Boil pasta in salted water"),
                Document::new("empty", ""),
            ])
            .await
            .unwrap();

        let hits = service.search("borrowing in rust", None).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, "rust");
        assert!(hits.iter().all(|h| !h.score.is_nan()));
    }
}

//! Embedding provider trait and factory.

use crate::providers::{OllamaProvider, TrigramProvider};
use semsearch_core::{AppError, AppResult, EmbeddingConfig};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Provider name (e.g., "trigram", "ollama")
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;

    /// Embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
///
/// Remote providers verify they are reachable before returning, so a
/// missing model fails here instead of on the first request.
pub async fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "trigram" => Ok(Arc::new(TrigramProvider::new(config.dimensions))),

        "ollama" => {
            let provider = OllamaProvider::new(config).await?;
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram, ollama",
            config.provider
        ))),
    }
}

/// Check a provider's output against its contract: one vector per input
/// text, all of the same non-zero length.
///
/// A violation means the provider is broken, so it is reported as
/// `AppError::Embedding` rather than as a caller error.
pub fn check_batch(texts: &[String], vectors: &[Vec<f32>]) -> AppResult<()> {
    if vectors.len() != texts.len() {
        return Err(AppError::Embedding(format!(
            "provider returned {} embeddings for {} texts",
            vectors.len(),
            texts.len()
        )));
    }

    if let Some(first) = vectors.first() {
        let dim = first.len();
        if dim == 0 {
            return Err(AppError::Embedding(
                "provider returned empty embeddings".to_string(),
            ));
        }
        if let Some(bad) = vectors.iter().position(|v| v.len() != dim) {
            return Err(AppError::Embedding(format!(
                "provider returned mixed dimensions: {} at 0, {} at {}",
                dim,
                vectors[bad].len(),
                bad
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_trigram_provider() {
        let config = EmbeddingConfig {
            dimensions: 128,
            ..Default::default()
        };

        let provider = create_provider(&config).await.unwrap();
        assert_eq!(provider.provider_name(), "trigram");
        assert_eq!(provider.model_name(), "trigram-v1");
        assert_eq!(provider.dimensions(), 128);
    }

    #[tokio::test]
    async fn test_create_unknown_provider() {
        let config = EmbeddingConfig {
            provider: "word2vec".to_string(),
            ..Default::default()
        };

        let result = create_provider(&config).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let provider = create_provider(&EmbeddingConfig::default()).await.unwrap();
        let embedding = provider.embed("test text").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }

    #[test]
    fn test_check_batch() {
        let texts = vec!["a".to_string(), "b".to_string()];

        assert!(check_batch(&texts, &[vec![1.0, 0.0], vec![0.0, 1.0]]).is_ok());
        assert!(check_batch(&[], &[]).is_ok());

        let short = check_batch(&texts, &[vec![1.0, 0.0]]);
        assert!(matches!(short, Err(AppError::Embedding(_))));

        let mixed = check_batch(&texts, &[vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(mixed, Err(AppError::Embedding(_))));

        let empty = check_batch(&texts, &[Vec::new(), Vec::new()]);
        assert!(matches!(empty, Err(AppError::Embedding(_))));
    }
}

//! Test providers with predictable output.

use semsearch_core::{AppError, AppResult};
use semsearch_embeddings::EmbeddingProvider;
use std::collections::HashMap;

/// Maps known texts to fixed vectors; unknown text is an error.
#[derive(Debug)]
pub struct FixedProvider {
    table: HashMap<String, Vec<f32>>,
    dimensions: usize,
}

impl FixedProvider {
    pub fn new(entries: Vec<(&str, Vec<f32>)>) -> Self {
        let dimensions = entries.first().map_or(0, |(_, v)| v.len());
        let table = entries
            .into_iter()
            .map(|(text, v)| (text.to_string(), v))
            .collect();
        Self { table, dimensions }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FixedProvider {
    fn provider_name(&self) -> &str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-table"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                self.table
                    .get(text)
                    .cloned()
                    .ok_or_else(|| AppError::Embedding(format!("no vector for '{}'", text)))
            })
            .collect()
    }
}

/// Always fails, like an unreachable model server.
#[derive(Debug)]
pub struct FailingProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for FailingProvider {
    fn provider_name(&self) -> &str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "none"
    }

    fn dimensions(&self) -> usize {
        2
    }

    async fn embed_batch(&self, _texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Err(AppError::Embedding("model not loaded".to_string()))
    }
}

/// Returns one vector fewer than requested.
#[derive(Debug)]
pub struct ShortProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for ShortProvider {
    fn provider_name(&self) -> &str {
        "short"
    }

    fn model_name(&self) -> &str {
        "short"
    }

    fn dimensions(&self) -> usize {
        2
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(vec![vec![1.0, 0.0]; texts.len().saturating_sub(1)])
    }
}

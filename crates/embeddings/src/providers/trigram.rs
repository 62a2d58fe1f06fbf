//! Trigram embedding provider: hashed character-trigram and word features.

use crate::provider::EmbeddingProvider;
use semsearch_core::AppResult;
use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

/// Offline, deterministic embedding provider.
///
/// Each remaining word (lowercased, stop words and words under three
/// characters dropped) adds its count to one hashed bucket and the square
/// root of its count to the bucket of each of its character trigrams.
/// Texts sharing vocabulary land close together; this is not a semantic
/// model, but it is stable and needs no network. Vectors are not
/// normalized here; text with no usable words yields the zero vector.
#[derive(Debug, Clone)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];
        if self.dimensions == 0 {
            return embedding;
        }

        let lower = text.to_lowercase();
        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in word_freq {
            let freq = freq as f32;

            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                embedding[self.bucket(&trigram, 0x9e37)] += freq.sqrt();
            }

            embedding[self.bucket(word, 0x85eb)] += freq;
        }

        embedding
    }

    /// FNV-1a over the bytes, salted so words and trigrams spread differently.
    fn bucket(&self, token: &str, salt: u64) -> usize {
        let hash = token
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64 ^ salt, |acc, b| {
                (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            });
        (hash % self.dimensions as u64) as usize
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

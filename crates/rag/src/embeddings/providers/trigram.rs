//! Trigram embedding provider using character trigram-based content-aware
//! embeddings.

use crate::embeddings::provider::EmbeddingProvider;
use ragchat_core::AppResult;
use std::collections::{HashMap, HashSet};

/// Common English function words excluded before hashing.
const STOP_WORDS: [&str; 31] = [
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they",
];

/// Trigram-based embedding provider for local, offline operation.
///
/// Generates deterministic embeddings from text content using character
/// trigrams and word frequencies. While not semantically accurate like
/// neural embedding models, it produces consistent, content-dependent
/// vectors: identical texts map to identical unit vectors, and texts
/// sharing vocabulary score higher under cosine similarity.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    /// Create a new trigram provider with the specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Generate a trigram-based embedding for one text.
    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];

        let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
        let lower = text.to_lowercase();

        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for word in lower
            .split_whitespace()
            .filter(|w| w.len() > 2 && !stop_words.contains(w))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            // Character trigrams spread each word across several dimensions
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                let bucket = (hash_str(&trigram, 37) as usize) % self.dimensions;
                embedding[bucket] += (*freq as f32).sqrt();
            }

            // Whole-word signal on top of the trigram buckets
            let bucket = (hash_str(word, 31) as usize) % self.dimensions;
            embedding[bucket] += *freq as f32;
        }

        // Normalize to unit vector; all-stop-word text stays a zero vector
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

/// Multiplicative rolling hash over the bytes of a string.
fn hash_str(s: &str, multiplier: u64) -> u64 {
    s.bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(multiplier).wrapping_add(b as u64))
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

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_dimensions() {
        let provider = TrigramProvider::new(384);
        let embedding = provider.embed("hello world").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = TrigramProvider::new(384);
        let a = provider.embed("the quick brown fox").await.unwrap();
        let b = provider.embed("the quick brown fox").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_unit_norm() {
        let provider = TrigramProvider::new(384);
        let embedding = provider.embed("normalized vectors everywhere").await.unwrap();
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_similar_texts_score_higher() {
        let provider = TrigramProvider::new(384);
        let query = provider.embed("capital city of France").await.unwrap();
        let related = provider.embed("France and its capital city").await.unwrap();
        let unrelated = provider.embed("quarterly revenue spreadsheet numbers").await.unwrap();

        assert!(cosine(&query, &related) > cosine(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_embed_batch_order() {
        let provider = TrigramProvider::new(128);
        let texts = vec!["first text".to_string(), "second text".to_string()];
        let embeddings = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0], provider.embed("first text").await.unwrap());
        assert_eq!(embeddings[1], provider.embed("second text").await.unwrap());
    }
}

//! In-memory vector index over document embeddings.
//!
//! Built once per uploaded dataset, owned exclusively by the session, and
//! rebuilt wholesale on each new upload. Retrieval ranks documents by
//! cosine similarity to the query embedding.

use crate::dataset::TabularDataset;
use crate::documents::{extract_documents, Document};
use crate::embeddings::EmbeddingProvider;
use ragchat_core::{AppError, AppResult};

/// One indexed document with its unit-normalized embedding.
#[derive(Debug, Clone)]
struct IndexEntry {
    document: Document,
    embedding: Vec<f32>,
}

/// Similarity-searchable index mapping each document to an embedding.
#[derive(Debug)]
pub struct VectorIndex {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index over every row of the dataset.
    ///
    /// Construction is all-or-nothing: any embedding failure surfaces as
    /// `IndexConstruction` and no partial index is exposed. An empty
    /// dataset yields a valid index over zero vectors.
    pub async fn build(
        dataset: &TabularDataset,
        provider: &dyn EmbeddingProvider,
    ) -> AppResult<Self> {
        let documents = extract_documents(dataset);

        tracing::info!(
            "Building vector index over {} documents (provider: {}, model: {})",
            documents.len(),
            provider.provider_name(),
            provider.model_name()
        );

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();

        let embeddings = provider.embed_batch(&texts).await.map_err(|e| {
            AppError::IndexConstruction(format!("Embedding provider failed: {}", e))
        })?;

        if embeddings.len() != documents.len() {
            return Err(AppError::IndexConstruction(format!(
                "Embedding count mismatch: {} documents, {} embeddings",
                documents.len(),
                embeddings.len()
            )));
        }

        let dimensions = provider.dimensions();
        let mut entries = Vec::with_capacity(documents.len());

        for (document, embedding) in documents.into_iter().zip(embeddings) {
            if embedding.len() != dimensions {
                return Err(AppError::IndexConstruction(format!(
                    "Embedding for row {} has dimension {}, expected {}",
                    document.row,
                    embedding.len(),
                    dimensions
                )));
            }

            entries.push(IndexEntry {
                document,
                embedding: normalize(embedding),
            });
        }

        tracing::debug!("Vector index built: {} entries", entries.len());

        Ok(Self {
            dimensions,
            entries,
        })
    }

    /// Embedding dimension the index was built with.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds zero documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retrieve the top-k documents most similar to the query embedding.
    ///
    /// Results are ordered by descending cosine similarity. An empty index
    /// returns an empty result set rather than failing.
    pub fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> AppResult<Vec<(&Document, f32)>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if query_embedding.len() != self.dimensions {
            return Err(AppError::Generation(format!(
                "Query embedding dimension {} does not match index dimension {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let mut results: Vec<(&Document, f32)> = self
            .entries
            .iter()
            .map(|entry| {
                let score = cosine_similarity(query_embedding, &entry.embedding);
                (&entry.document, score)
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        tracing::debug!(
            "Retrieved {} documents (requested top-{})",
            results.len(),
            top_k
        );

        Ok(results)
    }
}

/// Scale a vector to unit length. Zero vectors are left unchanged.
fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut v {
            *value /= norm;
        }
    }
    v
}

/// Calculate cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

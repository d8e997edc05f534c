//! Retrieval-augmented answering over uploaded datasets.
//!
//! This crate implements the three-stage pipeline behind ragchat:
//! dataset loading and normalization, embedding + vector index
//! construction, and retrieval-augmented query execution.

pub mod dataset;
pub mod documents;
pub mod embeddings;
pub mod index;
pub mod pipeline;

// Re-export commonly used types
pub use dataset::{load_dataset, FileType, TabularDataset};
pub use documents::{extract_documents, Document};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::VectorIndex;
pub use pipeline::AnswerPipeline;

//! Embedding generation for documents and queries.
//!
//! Provides a provider-agnostic embedding abstraction; the concrete model
//! behind it is an external collaborator.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};

/// Default embedding vector dimension.
pub const DEFAULT_DIMENSIONS: usize = 384;

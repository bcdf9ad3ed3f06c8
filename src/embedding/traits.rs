//! Embedding client trait definitions

use crate::types::Embedding;
use async_trait::async_trait;
use std::fmt::Debug;

/// Errors that can occur during embedding operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Embedding generation failed
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Core trait for embedding clients
///
/// Object-safe so the pipeline can hold a `dyn Embedder` and tests can
/// inject fakes.
#[async_trait]
pub trait Embedder: Send + Sync + Debug {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> EmbeddingResult<Embedding>;

    /// Get the embedding dimensions
    fn dimensions(&self) -> usize;
}

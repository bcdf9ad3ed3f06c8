//! Language model client trait definitions

use async_trait::async_trait;
use std::fmt::Debug;

/// Errors that can occur during language model calls
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Generation request failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for language model operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Core trait for language model clients
///
/// Takes a single prompt and returns the model's raw text reply. The reply
/// is untrusted free-form text; callers are responsible for any structured
/// interpretation. An empty string is a valid reply (the model produced no
/// usable text), distinct from a transport error.
#[async_trait]
pub trait Generator: Send + Sync + Debug {
    /// Generate a text reply for a single prompt
    async fn generate(&self, prompt: &str) -> LlmResult<String>;
}

//! Quote store trait definitions

use crate::types::{CandidateRow, Mode, Quote};
use async_trait::async_trait;
use std::fmt::Debug;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store rejected or failed the request
    #[error("Store request failed: {0}")]
    RequestFailed(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Core trait for quote corpus access
///
/// Object-safe so the pipeline can hold a `dyn QuoteStore` and tests can
/// inject fakes.
#[async_trait]
pub trait QuoteStore: Send + Sync + Debug {
    /// Similarity search: all rows above `threshold`, at most `top_k` of
    /// them, in no guaranteed order. An empty result is a valid outcome,
    /// not an error.
    async fn match_candidates(
        &self,
        vector: &[f32],
        threshold: f32,
        top_k: usize,
    ) -> StoreResult<Vec<CandidateRow>>;

    /// Total number of quotes in the corpus
    async fn count_quotes(&self) -> StoreResult<u64>;

    /// Read the single quote at a numeric offset, if any
    async fn quote_at(&self, offset: u64) -> StoreResult<Option<Quote>>;

    /// Insert a quote row with its embedding (ingestion path)
    async fn insert_quote(&self, quote: &Quote, embedding: &[f32]) -> StoreResult<()>;

    /// Record a served interaction (raw input, mode, matched quote id)
    async fn log_interaction(&self, input: &str, mode: Mode, quote_id: i64) -> StoreResult<()>;
}

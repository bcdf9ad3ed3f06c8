//! Pipeline orchestrator

use crate::config::RetrievalConfig;
use crate::embedding::{Embedder, EmbeddingError};
use crate::llm::{Generator, LlmError};
use crate::rerank::ModeReranker;
use crate::store::{QuoteStore, StoreError};
use crate::types::{Mode, PickedQuote, Quote};
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Fixed quote returned when retrieval produces zero candidates
const FALLBACK_TEXT: &str = "오늘을 견디는 힘은 내 안에 있다.";

/// Errors surfaced by the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PickError {
    /// Empty input text in a non-random mode; user-correctable
    #[error("input must be non-empty")]
    EmptyInput,

    /// Random mode against an empty (or unreadable) corpus
    #[error("no quotes available")]
    NoData,

    /// Embedding service failure
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Similarity-store RPC failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Language model transport failure
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl PickError {
    /// Whether the error is user-correctable (as opposed to infrastructure)
    pub fn is_validation(&self) -> bool {
        matches!(self, PickError::EmptyInput)
    }
}

/// Retrieval tuning handed to the picker
#[derive(Debug, Clone)]
pub struct PickOptions {
    pub match_threshold: f32,
    pub top_k: usize,
}

impl Default for PickOptions {
    fn default() -> Self {
        RetrievalConfig::default().into()
    }
}

impl From<RetrievalConfig> for PickOptions {
    fn from(config: RetrievalConfig) -> Self {
        Self {
            match_threshold: config.match_threshold,
            top_k: config.top_k,
        }
    }
}

/// The synthetic quote served when no real candidate is available.
///
/// Never originates from the corpus, so it carries no id and is excluded
/// from interaction logging.
pub fn fallback_quote() -> Quote {
    Quote {
        id: None,
        text: FALLBACK_TEXT.to_string(),
        author: "system".to_string(),
        source: "fallback".to_string(),
        emotion_tags: Vec::new(),
    }
}

/// Pipeline orchestrator: mode dispatch, the embed/retrieve/rerank chain,
/// and the fallback ladder.
///
/// Holds shared, stateless client handles; one instance serves all requests.
pub struct QuotePicker {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn QuoteStore>,
    reranker: ModeReranker,
    options: PickOptions,
}

impl QuotePicker {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn QuoteStore>,
        generator: Arc<dyn Generator>,
        options: PickOptions,
    ) -> Self {
        Self {
            embedder,
            store,
            reranker: ModeReranker::new(generator),
            options,
        }
    }

    /// Run the pipeline for one request.
    pub async fn pick(&self, input: &str, mode: Mode) -> Result<PickedQuote, PickError> {
        let start = Instant::now();

        let picked = match mode {
            Mode::Random => self.pick_random().await?,
            Mode::Harsh | Mode::Comfort => self.pick_matched(input, mode).await?,
        };

        debug!(
            mode = %mode,
            degraded = picked.degraded,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Pick complete"
        );
        Ok(picked)
    }

    /// Embed, retrieve, rerank, with the fallback ladder applied.
    async fn pick_matched(&self, input: &str, mode: Mode) -> Result<PickedQuote, PickError> {
        if input.trim().is_empty() {
            return Err(PickError::EmptyInput);
        }

        let vector = self.embedder.embed(input).await?;
        let candidates = self
            .store
            .match_candidates(&vector, self.options.match_threshold, self.options.top_k)
            .await?;

        // An empty similarity result is common and is not an error
        if candidates.is_empty() {
            info!("No candidates above threshold, serving fallback quote");
            return Ok(PickedQuote {
                quote: fallback_quote(),
                degraded: true,
            });
        }

        let quotes: Vec<Quote> = candidates.into_iter().map(|c| c.into_quote()).collect();

        match self.reranker.rerank(mode, input, &quotes).await? {
            Some(quote) => Ok(PickedQuote {
                quote,
                degraded: false,
            }),
            None => {
                debug!("Reranker yielded no pick, falling back to first candidate");
                Ok(PickedQuote {
                    quote: quotes[0].clone(),
                    degraded: true,
                })
            }
        }
    }

    /// Uniform random pick: a count query, then a single ranged read.
    ///
    /// Store failures on this path fold into the no-data outcome (logged,
    /// not propagated): the random path's contract is "a quote or nothing",
    /// and nothing surfaces as `NoData`.
    async fn pick_random(&self) -> Result<PickedQuote, PickError> {
        let count = match self.store.count_quotes().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Random pick count query failed: {}", e);
                return Err(PickError::NoData);
            }
        };
        if count == 0 {
            return Err(PickError::NoData);
        }

        let offset = rand::thread_rng().gen_range(0..count);
        match self.store.quote_at(offset).await {
            Ok(Some(quote)) => Ok(PickedQuote {
                quote,
                degraded: false,
            }),
            Ok(None) => Err(PickError::NoData),
            Err(e) => {
                warn!("Random pick read at offset {} failed: {}", offset, e);
                Err(PickError::NoData)
            }
        }
    }
}

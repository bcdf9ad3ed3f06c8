//! Shared test fakes for the pipeline and HTTP tests
//!
//! The pipeline holds `dyn` client handles, so these fakes stand in for the
//! embedding service, the quote store and the language model without any
//! network access. Call counters let tests assert which outbound calls
//! were (not) made.

#![allow(dead_code)]

use async_trait::async_trait;
use quotepick::embedding::{Embedder, EmbeddingError, EmbeddingResult};
use quotepick::llm::{Generator, LlmError, LlmResult};
use quotepick::pipeline::{PickOptions, QuotePicker};
use quotepick::store::{QuoteStore, StoreError, StoreResult};
use quotepick::types::{CandidateRow, Embedding, Mode, Quote};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct FakeEmbedder {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> EmbeddingResult<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbeddingError::EmbeddingFailed("embedding down".to_string()));
        }
        Ok(vec![0.1; 8])
    }

    fn dimensions(&self) -> usize {
        8
    }
}

#[derive(Debug, Default)]
pub struct FakeStore {
    pub candidates: Vec<CandidateRow>,
    pub count: u64,
    pub row: Option<Quote>,
    pub fail_match: bool,
    pub fail_count: bool,
    pub fail_read: bool,
    pub match_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
    pub read_calls: AtomicUsize,
    pub interactions: Mutex<Vec<(String, Mode, i64)>>,
}

#[async_trait]
impl QuoteStore for FakeStore {
    async fn match_candidates(
        &self,
        _vector: &[f32],
        _threshold: f32,
        _top_k: usize,
    ) -> StoreResult<Vec<CandidateRow>> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_match {
            return Err(StoreError::RequestFailed("rpc down".to_string()));
        }
        Ok(self.candidates.clone())
    }

    async fn count_quotes(&self) -> StoreResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_count {
            return Err(StoreError::RequestFailed("count down".to_string()));
        }
        Ok(self.count)
    }

    async fn quote_at(&self, _offset: u64) -> StoreResult<Option<Quote>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_read {
            return Err(StoreError::RequestFailed("read down".to_string()));
        }
        Ok(self.row.clone())
    }

    async fn insert_quote(&self, _quote: &Quote, _embedding: &[f32]) -> StoreResult<()> {
        Ok(())
    }

    async fn log_interaction(&self, input: &str, mode: Mode, quote_id: i64) -> StoreResult<()> {
        self.interactions
            .lock()
            .unwrap()
            .push((input.to_string(), mode, quote_id));
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeGenerator {
    pub reply: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeGenerator {
    /// A generator that always returns `reply`
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A generator whose transport always fails
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, _prompt: &str) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(LlmError::GenerationFailed("llm down".to_string())),
        }
    }
}

pub fn candidate(id: i64, text: &str) -> CandidateRow {
    CandidateRow {
        id,
        text: text.to_string(),
        author: format!("저자{}", id),
        source: format!("출처{}", id),
        similarity: 0.5,
    }
}

pub fn corpus_quote(id: i64, text: &str) -> Quote {
    Quote {
        id: Some(id),
        text: text.to_string(),
        author: "저자".to_string(),
        source: "출처".to_string(),
        emotion_tags: Vec::new(),
    }
}

pub fn three_candidates() -> Vec<CandidateRow> {
    vec![
        candidate(10, "첫 번째 후보"),
        candidate(20, "두 번째 후보"),
        candidate(30, "세 번째 후보"),
    ]
}

pub fn build_picker(
    embedder: Arc<FakeEmbedder>,
    store: Arc<FakeStore>,
    generator: Arc<FakeGenerator>,
) -> QuotePicker {
    QuotePicker::new(embedder, store, generator, PickOptions::default())
}

//! Mode-aware reranker

use super::parse::{clamp_index, try_parse_structured_pick};
use super::prompt::build_rerank_prompt;
use crate::llm::{Generator, LlmError};
use crate::types::{Mode, Quote};
use std::sync::Arc;
use tracing::debug;

/// Reranker that asks the language model to pick one candidate.
///
/// Exactly one generation call per invocation. Transport failures propagate;
/// content-level failures (empty or unparseable replies) degrade to `None`
/// so the caller can fall back deterministically.
pub struct ModeReranker {
    generator: Arc<dyn Generator>,
}

impl ModeReranker {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Pick the best-fitting candidate for `input` under `mode`.
    ///
    /// Returns `Ok(None)` when the model's reply yields no usable pick.
    pub async fn rerank(
        &self,
        mode: Mode,
        input: &str,
        candidates: &[Quote],
    ) -> Result<Option<Quote>, LlmError> {
        if candidates.is_empty() {
            return Ok(None);
        }

        let prompt = build_rerank_prompt(mode, input, candidates);
        let reply = self.generator.generate(&prompt).await?;

        if reply.trim().is_empty() {
            debug!("Reranker reply was empty");
            return Ok(None);
        }

        let Some(pick) = try_parse_structured_pick(&reply) else {
            debug!("Reranker reply had no parseable pick");
            return Ok(None);
        };

        let index = clamp_index(pick.index, candidates.len());
        debug!(
            index,
            reason = pick.reason.as_deref().unwrap_or(""),
            "Reranker picked candidate"
        );
        Ok(Some(candidates[index].clone()))
    }
}

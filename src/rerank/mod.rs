//! Mode-aware reranking
//!
//! Asks a language model to choose one final candidate from a shortlist,
//! with a tone persona selected by the request mode. Model output is
//! untrusted: the structured pick is recovered with a bounded-effort JSON
//! extraction and the chosen index is clamped into range, so a slightly
//! malformed answer still yields a pick instead of an error.

pub mod parse;
pub mod prompt;
pub mod reranker;

pub use parse::{clamp_index, try_parse_structured_pick, RawPick};
pub use prompt::build_rerank_prompt;
pub use reranker::ModeReranker;

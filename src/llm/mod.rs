//! Language model generation
//!
//! A thin text-in/text-out client used by the reranker. The pipeline makes
//! exactly one generation call per request; there is no multi-turn
//! refinement and no retry.

pub mod gemini;
pub mod traits;

pub use gemini::GeminiGenerator;
pub use traits::{Generator, LlmError, LlmResult};

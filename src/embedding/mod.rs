//! Text embedding
//!
//! Turns free text into a fixed-length vector via an external embedding
//! model. The pipeline makes exactly one embedding call per request; there
//! is no batching or retry at this layer.

pub mod gemini;
pub mod traits;

pub use gemini::GeminiEmbedder;
pub use traits::{Embedder, EmbeddingError, EmbeddingResult};

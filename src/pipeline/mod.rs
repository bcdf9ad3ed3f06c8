//! Single-request decision pipeline
//!
//! Composes embedder, retriever and reranker by mode and applies the
//! fallback ladder: content selection never hard-fails (zero candidates and
//! unparseable reranker replies resolve to deterministic fallbacks), while
//! infrastructure failures (embedding, retrieval RPC, generation transport)
//! propagate to the caller.

pub mod picker;

pub use picker::{fallback_quote, PickError, PickOptions, QuotePicker};

//! quotepick: mode-aware RAG quote recommendation
//!
//! Given free-text user input and a desired emotional mode, returns one
//! quotation judged to fit:
//! - Embedding of the input via an external embedding model
//! - Candidate retrieval via the store's similarity-search RPC
//! - Mode-aware LLM reranking with lenient structured-output parsing
//! - A deterministic fallback ladder so content selection never hard-fails
//!
//! Random mode bypasses retrieval and picks uniformly from the corpus.

pub mod config;
pub mod embedding;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod rerank;
pub mod server;
pub mod store;
pub mod types;

pub use config::Config;
pub use types::*;

//! HTTP API request/response types

use crate::types::{Mode, Quote};
use serde::{Deserialize, Serialize};

/// Quote request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Free-text user input; may be empty only in random mode
    #[serde(default)]
    pub query: String,
    /// Tone selector (defaults to comfort)
    #[serde(default)]
    pub mode: Mode,
}

/// Quote response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: String,
    pub author: String,
    pub source: String,
}

impl From<&Quote> for QuoteResponse {
    fn from(quote: &Quote) -> Self {
        Self {
            quote: quote.text.clone(),
            author: quote.author.clone(),
            source: quote.source.clone(),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

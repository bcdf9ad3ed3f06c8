//! Core types for the quotepick service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// A stored quotation.
///
/// Rows are created by the offline ingestion path and are read-only to the
/// request pipeline. The `id` is present for corpus rows and absent for the
/// synthetic fallback quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Quotation text (stored under the `quote` column)
    #[serde(rename = "quote")]
    pub text: String,
    pub author: String,
    pub source: String,
    /// Emotion tags assigned at ingestion time (stored under `emotion`)
    #[serde(default, rename = "emotion", skip_serializing_if = "Vec::is_empty")]
    pub emotion_tags: Vec<String>,
}

/// A quote surfaced by similarity search, with its similarity score.
///
/// The retriever contract guarantees "all rows above threshold, at most K of
/// them"; it does not guarantee any ordering across candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRow {
    pub id: i64,
    #[serde(rename = "quote")]
    pub text: String,
    pub author: String,
    pub source: String,
    /// Similarity score, higher is more similar
    pub similarity: f32,
}

impl CandidateRow {
    /// Convert into a plain `Quote`, keeping the corpus id.
    pub fn into_quote(self) -> Quote {
        Quote {
            id: Some(self.id),
            text: self.text,
            author: self.author,
            source: self.source,
            emotion_tags: Vec::new(),
        }
    }
}

/// Tone selector for quote curation.
///
/// `Harsh` and `Comfort` select the reranker persona; `Random` bypasses
/// retrieval entirely and picks uniformly from the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Harsh,
    #[default]
    Comfort,
    Random,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Harsh => "harsh",
            Mode::Comfort => "comfort",
            Mode::Random => "random",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "harsh" => Ok(Mode::Harsh),
            "comfort" => Ok(Mode::Comfort),
            "random" => Ok(Mode::Random),
            other => Err(format!(
                "unknown mode '{}' (expected harsh, comfort or random)",
                other
            )),
        }
    }
}

/// Result of a pipeline run.
///
/// `degraded` is set when a fallback fired (zero candidates, or an
/// unparseable reranker reply); the response is still a normal success.
#[derive(Debug, Clone)]
pub struct PickedQuote {
    pub quote: Quote,
    pub degraded: bool,
}

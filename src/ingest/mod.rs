//! Offline corpus ingestion
//!
//! Reads a JSON file of quote records, embeds each text and inserts the row
//! with its embedding. Per-row failures are logged and skipped so one bad
//! record doesn't abort a long run.

use crate::embedding::Embedder;
use crate::store::QuoteStore;
use crate::types::Quote;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// A quote record as it appears in the ingestion file
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRecord {
    #[serde(rename = "quote")]
    pub text: String,
    pub author: String,
    pub source: String,
    #[serde(default, rename = "emotion")]
    pub emotion_tags: Vec<String>,
}

impl From<QuoteRecord> for Quote {
    fn from(record: QuoteRecord) -> Self {
        Quote {
            id: None,
            text: record.text,
            author: record.author,
            source: record.source,
            emotion_tags: record.emotion_tags,
        }
    }
}

/// Ingestion outcome counts
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub inserted: usize,
    pub failed: usize,
}

/// Ingest a JSON file of quote records.
///
/// Rows are processed sequentially: one embedding call, one insert each.
pub async fn ingest_file(
    path: &Path,
    embedder: &dyn Embedder,
    store: &dyn QuoteStore,
) -> Result<IngestSummary> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read quote file '{}'", path.display()))?;
    let records: Vec<QuoteRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse quote file '{}'", path.display()))?;

    info!("Ingesting {} quotes from {}", records.len(), path.display());

    let mut summary = IngestSummary::default();
    for record in records {
        let preview: String = record.text.chars().take(40).collect();
        let quote = Quote::from(record);

        let embedding = match embedder.embed(&quote.text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Embedding failed for '{}…': {}", preview, e);
                summary.failed += 1;
                continue;
            }
        };

        match store.insert_quote(&quote, &embedding).await {
            Ok(()) => {
                info!("Inserted: {} - {}…", quote.author, preview);
                summary.inserted += 1;
            }
            Err(e) => {
                warn!("Insert failed for '{}…': {}", preview, e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Ingestion complete: {} inserted, {} failed",
        summary.inserted, summary.failed
    );
    Ok(summary)
}

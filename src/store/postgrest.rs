//! Supabase/PostgREST quote store
//!
//! Speaks the PostgREST REST dialect: similarity search through the
//! `match_quote_embeddings` RPC (pgvector on the server side), counted and
//! ranged reads for the random path, plain inserts for ingestion and
//! interaction logging.

use super::traits::{QuoteStore, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::types::{CandidateRow, Mode, Quote};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RANGE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Raw-input log table
const USER_INPUT_TABLE: &str = "user_input";
/// Matched-quote log table
const USER_INTERACTIONS_TABLE: &str = "user_interactions";

/// Similarity-search RPC request body
#[derive(Debug, Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_threshold: f32,
    match_count: usize,
}

/// PostgREST error response format
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

/// Quote store backed by Supabase's PostgREST API
#[derive(Debug)]
pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    match_function: String,
    quotes_table: String,
}

impl PostgrestStore {
    /// Create a new PostgREST store client.
    ///
    /// Fails fast when the project URL or service-role key is missing.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let url = config
            .url
            .clone()
            .or_else(|| std::env::var("SUPABASE_URL").ok())
            .ok_or_else(|| {
                StoreError::Config(
                    "Missing Supabase URL (set SUPABASE_URL or [store].url)".to_string(),
                )
            })?;
        let service_key = config
            .service_key
            .clone()
            .or_else(|| std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok())
            .ok_or_else(|| {
                StoreError::Config(
                    "Missing Supabase service key (set SUPABASE_SERVICE_ROLE_KEY or [store].service_key)"
                        .to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(&service_key)
                .map_err(|e| StoreError::Config(format!("Invalid service key format: {}", e)))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", service_key))
                .map_err(|e| StoreError::Config(format!("Invalid service key format: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "Initialized PostgREST store client: table={}, rpc={}",
            config.quotes_table, config.match_function
        );

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            match_function: config.match_function.clone(),
            quotes_table: config.quotes_table.clone(),
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    /// Turn a non-success response into a `StoreError` with the PostgREST
    /// message when one is present.
    async fn check_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        if let Ok(error) = serde_json::from_str::<PostgrestError>(&error_text) {
            return Err(StoreError::RequestFailed(format!(
                "{} ({})",
                error.message, status
            )));
        }
        Err(StoreError::RequestFailed(format!(
            "HTTP error ({}): {}",
            status, error_text
        )))
    }
}

#[async_trait]
impl QuoteStore for PostgrestStore {
    async fn match_candidates(
        &self,
        vector: &[f32],
        threshold: f32,
        top_k: usize,
    ) -> StoreResult<Vec<CandidateRow>> {
        let url = self.rest_url(&format!("rpc/{}", self.match_function));
        let request = MatchRequest {
            query_embedding: vector,
            match_threshold: threshold,
            match_count: top_k,
        };

        debug!(
            "Similarity search: threshold={}, top_k={}",
            threshold, top_k
        );

        let response = self.client.post(&url).json(&request).send().await?;
        let response = Self::check_status(response).await?;

        let rows: Vec<CandidateRow> = response
            .json()
            .await
            .map_err(|e| StoreError::RequestFailed(format!("Failed to parse rows: {}", e)))?;

        debug!("Similarity search returned {} candidates", rows.len());
        Ok(rows)
    }

    async fn count_quotes(&self) -> StoreResult<u64> {
        let url = self.rest_url(&self.quotes_table);
        let response = self
            .client
            .get(&url)
            .query(&[("select", "id")])
            .header(RANGE, "0-0")
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| {
                StoreError::RequestFailed("Missing content-range header on count query".to_string())
            })?;
        Ok(total)
    }

    async fn quote_at(&self, offset: u64) -> StoreResult<Option<Quote>> {
        let url = self.rest_url(&self.quotes_table);
        let response = self
            .client
            .get(&url)
            .query(&[("select", "id,quote,author,source")])
            .header(RANGE, format!("{}-{}", offset, offset))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let mut rows: Vec<Quote> = response
            .json()
            .await
            .map_err(|e| StoreError::RequestFailed(format!("Failed to parse rows: {}", e)))?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.remove(0)))
    }

    async fn insert_quote(&self, quote: &Quote, embedding: &[f32]) -> StoreResult<()> {
        let url = self.rest_url(&self.quotes_table);
        let body = json!({
            "quote": quote.text,
            "author": quote.author,
            "source": quote.source,
            "emotion": quote.emotion_tags,
            "embedding": embedding,
        });

        let response = self
            .client
            .post(&url)
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn log_interaction(&self, input: &str, mode: Mode, quote_id: i64) -> StoreResult<()> {
        // Raw input row first; its failure shouldn't block the richer record
        let input_row = json!({
            "input_text": input,
            "selected_mode": mode.as_str(),
        });
        let response = self
            .client
            .post(self.rest_url(USER_INPUT_TABLE))
            .header("Prefer", "return=minimal")
            .json(&input_row)
            .send()
            .await;
        match response {
            Ok(r) => {
                if let Err(e) = Self::check_status(r).await {
                    warn!("user_input insert failed: {}", e);
                }
            }
            Err(e) => warn!("user_input insert failed: {}", e),
        }

        let interaction_row = json!({
            "input_text": input,
            "selected_mode": mode.as_str(),
            "quote_id": quote_id,
        });
        let response = self
            .client
            .post(self.rest_url(USER_INTERACTIONS_TABLE))
            .header("Prefer", "return=minimal")
            .json(&interaction_row)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

/// Parse the total from a PostgREST `content-range` header value,
/// e.g. `"0-0/42"` or `"*/0"`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-0/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range_total("*/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_match_request_serialization() {
        let vector = vec![0.1_f32, 0.2, 0.3];
        let request = MatchRequest {
            query_embedding: &vector,
            match_threshold: 0.15,
            match_count: 5,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["match_count"], 5);
        assert_eq!(json["query_embedding"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_url_fails_fast() {
        let config = StoreConfig::default();
        if std::env::var("SUPABASE_URL").is_err() {
            assert!(matches!(
                PostgrestStore::new(&config),
                Err(StoreError::Config(_))
            ));
        }
    }
}

//! Gemini embedding client
//!
//! Calls the Google Generative Language `embedContent` endpoint
//! (`text-embedding-004`, 768 dimensions by default).

use super::traits::{Embedder, EmbeddingError, EmbeddingResult};
use crate::config::EmbeddingConfig;
use crate::types::Embedding;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Gemini embedContent request body
#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    model: String,
    content: ContentPayload<'a>,
}

#[derive(Debug, Serialize)]
struct ContentPayload<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

/// Gemini embedContent response body
#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    #[serde(default)]
    embedding: Option<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

/// Google API error response format
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Embedding client backed by the Gemini API
#[derive(Debug)]
pub struct GeminiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
}

impl GeminiEmbedder {
    /// Create a new Gemini embedding client.
    ///
    /// Fails fast when no API key is available, per the explicit-construction
    /// policy: a service without credentials should not start.
    pub fn new(config: &EmbeddingConfig) -> EmbeddingResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                EmbeddingError::Config(
                    "Missing Google API key (set GOOGLE_API_KEY or [embedding].api_key)"
                        .to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| EmbeddingError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "Initialized Gemini embedding client: model={}, {} dimensions",
            config.model, config.dimensions
        );

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            dimensions: config.dimensions,
        })
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Embedding> {
        let url = format!("{}/models/{}:embedContent", self.endpoint, self.model);
        let request = EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: ContentPayload {
                parts: vec![TextPart { text }],
            },
        };

        debug!("Sending embedContent request to model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                return Err(EmbeddingError::EmbeddingFailed(format!(
                    "API error ({}): {}",
                    status, error_response.error.message
                )));
            }
            return Err(EmbeddingError::EmbeddingFailed(format!(
                "HTTP error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbedContentResponse = response.json().await.map_err(|e| {
            EmbeddingError::EmbeddingFailed(format!("Failed to parse response: {}", e))
        })?;

        let values = body.embedding.map(|e| e.values).unwrap_or_default();
        if values.is_empty() {
            return Err(EmbeddingError::EmbeddingFailed(
                "No embedding returned".to_string(),
            ));
        }

        debug!("Received embedding with {} dimensions", values.len());
        Ok(values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

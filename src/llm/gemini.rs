//! Gemini generation client
//!
//! Calls the Google Generative Language `generateContent` endpoint and
//! flattens the first candidate's parts into a single text reply.

use super::traits::{Generator, LlmError, LlmResult};
use crate::config::LlmConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Gemini generateContent request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

/// Gemini generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
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

/// Generation client backed by the Gemini API
#[derive(Debug)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generation client. Fails fast on a missing key.
    pub fn new(config: &LlmConfig) -> LlmResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                LlmError::Config(
                    "Missing Google API key (set GOOGLE_API_KEY or [llm].api_key)".to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!("Initialized Gemini generation client: model={}", config.model);

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
        };

        debug!(
            "Sending generateContent request to model {} ({} prompt bytes)",
            self.model,
            prompt.len()
        );

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
                return Err(LlmError::GenerationFailed(format!(
                    "API error ({}): {}",
                    status, error_response.error.message
                )));
            }
            return Err(LlmError::GenerationFailed(format!(
                "HTTP error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::GenerationFailed(format!("Failed to parse response: {}", e)))?;

        // A blocked or empty completion is a content-level outcome, not a
        // transport failure; surface it as an empty reply.
        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            debug!("generateContent returned no text");
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_flattening() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [ {"text": "{ \"index\": 1, "}, {"text": "\"reason\": \"ok\" }"} ] } }
            ]
        }"#;
        let body: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let text: String = body.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        assert_eq!(text, "{ \"index\": 1, \"reason\": \"ok\" }");
    }

    #[test]
    fn test_empty_candidates_is_not_an_error() {
        let body: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(body.candidates.is_empty());
    }
}

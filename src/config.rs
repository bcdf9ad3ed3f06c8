//! Configuration for quotepick

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Default timeout for outbound HTTP requests
fn default_timeout() -> u64 {
    30
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_embedding_dimensions() -> usize {
    768
}

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_genai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_match_function() -> String {
    "match_quote_embeddings".to_string()
}

fn default_quotes_table() -> String {
    "quote_embeddings".to_string()
}

fn default_match_threshold() -> f32 {
    0.15
}

fn default_top_k() -> usize {
    5
}

/// Main configuration for the quotepick service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpConfig,
    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Language model configuration (reranking)
    #[serde(default)]
    pub llm: LlmConfig,
    /// Quote store (Supabase/PostgREST) configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Retrieval tuning
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist. Environment overrides are applied either way, so
    /// a fully env-configured deployment needs no config file at all.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
            })?;
            toml::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
            })?
        } else {
            info!(
                "Config file '{}' not found, using defaults + environment",
                path.display()
            );
            Config::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Secrets always come from the environment when not set in the file;
    /// the tuning knobs (`RAG_TOP_K`, `RAG_MATCH_THRESHOLD`, `PORT`,
    /// `CORS_ORIGINS`) mirror the knobs the service has historically exposed.
    pub fn apply_env(&mut self) {
        if self.embedding.api_key.is_none() {
            self.embedding.api_key = std::env::var("GOOGLE_API_KEY").ok();
        }
        if self.llm.api_key.is_none() {
            self.llm.api_key = std::env::var("GOOGLE_API_KEY").ok();
        }
        if self.store.url.is_none() {
            self.store.url = std::env::var("SUPABASE_URL").ok();
        }
        if self.store.service_key.is_none() {
            self.store.service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok();
        }
        if let Some(top_k) = std::env::var("RAG_TOP_K")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.retrieval.top_k = top_k;
        }
        if let Some(threshold) = std::env::var("RAG_MATCH_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
        {
            self.retrieval.match_threshold = threshold;
        }
        if let Some(port) = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
        {
            let host = self
                .http
                .listen_addr
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.http.listen_addr = format!("{}:{}", host, port);
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            self.http.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass rather than playing whack-a-mole.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.embedding.dimensions == 0 {
            errors.push("embedding dimensions must be positive".to_string());
        }
        if self.embedding.dimensions > 4096 {
            errors.push("embedding dimensions must be <= 4096".to_string());
        }
        if self.embedding.timeout_secs == 0 {
            errors.push("embedding timeout_secs must be positive".to_string());
        }
        if self.llm.timeout_secs == 0 {
            errors.push("llm timeout_secs must be positive".to_string());
        }
        if self.store.timeout_secs == 0 {
            errors.push("store timeout_secs must be positive".to_string());
        }

        if self.retrieval.top_k == 0 {
            errors.push("top_k must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.retrieval.match_threshold) {
            errors.push("match_threshold must be between 0.0 and 1.0".to_string());
        }

        if let Some(port_str) = self.http.listen_addr.rsplit(':').next() {
            match port_str.parse::<u32>() {
                Ok(port) if port == 0 || port > 65535 => {
                    errors.push(format!(
                        "HTTP listen port must be between 1 and 65535, got {}",
                        port
                    ));
                }
                Ok(_) => {}
                Err(_) => {
                    errors.push(format!(
                        "HTTP listen_addr '{}' must end in a port",
                        self.http.listen_addr
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }

    /// Warn about missing credentials without failing.
    ///
    /// Hard failure is deferred to client construction so read-only commands
    /// (`check`, config inspection) still work with a partial environment.
    pub fn warn_missing_credentials(&self) {
        if self.embedding.api_key.is_none() || self.llm.api_key.is_none() {
            warn!("Missing Google API key (set GOOGLE_API_KEY or [embedding]/[llm] api_key)");
        }
        if self.store.url.is_none() || self.store.service_key.is_none() {
            warn!("Missing Supabase envs (set SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY)");
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address (host:port)
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Allowed CORS origins; empty means allow all
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_origins: Vec::new(),
        }
    }
}

/// Embedding model configuration
///
/// ```toml
/// [embedding]
/// model = "text-embedding-004"
/// dimensions = 768
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name for embedContent requests
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Embedding dimensions produced by the model
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,
    /// API key (optional, falls back to GOOGLE_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,
    /// API base URL
    #[serde(default = "default_genai_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimensions: default_embedding_dimensions(),
            api_key: None,
            endpoint: default_genai_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Language model configuration for the mode-aware reranker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name for generateContent requests
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// API key (optional, falls back to GOOGLE_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,
    /// API base URL
    #[serde(default = "default_genai_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            api_key: None,
            endpoint: default_genai_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Quote store (Supabase/PostgREST) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project base URL (falls back to SUPABASE_URL env var)
    #[serde(default)]
    pub url: Option<String>,
    /// Service-role key (falls back to SUPABASE_SERVICE_ROLE_KEY env var)
    #[serde(default)]
    pub service_key: Option<String>,
    /// Similarity-search RPC function name
    #[serde(default = "default_match_function")]
    pub match_function: String,
    /// Quotes table name
    #[serde(default = "default_quotes_table")]
    pub quotes_table: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            match_function: default_match_function(),
            quotes_table: default_quotes_table(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Retrieval tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Minimum similarity for a candidate to be considered
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    /// Maximum number of candidates handed to the reranker
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            top_k: default_top_k(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Models commonly pulled for local use
pub const SUGGESTED_MODELS: &[&str] = &["llama3.2", "llama3.1", "mistral", "qwen2.5:7b", "phi3"];

/// Liveness check timeout
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);

/// Generation timeout
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Text returned when the daemon answers without a `response` field
pub(crate) const EMPTY_RESPONSE: &str = "No response";

/// Ollama adapter configuration
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL (default: http://localhost:11434)
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Liveness check timeout
    pub liveness_timeout: Duration,
    /// Generation timeout
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            liveness_timeout: LIVENESS_TIMEOUT,
            timeout: GENERATE_TIMEOUT,
        }
    }
}

impl OllamaConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL; a bare `host:port` (as in `OLLAMA_HOST`) gets an
    /// `http://` scheme
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&url.into());
        self
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the liveness check timeout
    #[must_use]
    pub fn with_liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = timeout;
        self
    }

    /// Set the generation timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Request body for /api/generate
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Response body of a non-streaming /api/generate call
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    pub response: Option<String>,
}

/// Error response from Ollama API
#[derive(Debug, Deserialize)]
pub(crate) struct OllamaError {
    pub error: String,
}

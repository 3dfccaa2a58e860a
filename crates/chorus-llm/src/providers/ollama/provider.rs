use super::types::{
    GenerateRequest, GenerateResponse, OllamaConfig, OllamaError, EMPTY_RESPONSE,
};
use crate::adapter::{ChatAdapter, ChatOutcome};
use crate::error::{Error, Result};
use crate::vendor::Vendor;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

/// Failure reported when the liveness check fails at chat time
const NOT_RUNNING: &str = "Ollama not running. Start with: ollama serve";

/// Ollama local adapter
pub struct OllamaAdapter {
    client: Client,
    config: OllamaConfig,
}

impl OllamaAdapter {
    /// Create a new Ollama adapter
    ///
    /// Timeouts are set per request: the liveness check and generation use different ones.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Base URL in use
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Liveness check: GET /api/tags must return 200 within the liveness timeout.
    /// Any error counts as not running.
    pub async fn is_running(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        match self
            .client
            .get(&url)
            .timeout(self.config.liveness_timeout)
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!(error = %e.without_url(), "Ollama liveness check failed");
                false
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url);
        let timeout_ms = self.config.timeout.as_millis() as u64;

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        debug!("Sending request to Ollama: {}", url);

        let response = self
            .client
            .post(&url)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, timeout_ms))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_transport(e, timeout_ms))?;

        if status != StatusCode::OK {
            if let Ok(error) = serde_json::from_str::<OllamaError>(&body) {
                return Err(Error::Api(format!("{}: {}", status.as_u16(), error.error)));
            }
            return Err(Error::Api(status.as_u16().to_string()));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .response
            .unwrap_or_else(|| EMPTY_RESPONSE.to_string()))
    }
}

#[async_trait::async_trait]
impl ChatAdapter for OllamaAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Ollama
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn is_configured(&self) -> bool {
        self.is_running().await
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn chat(&self, prompt: &str) -> ChatOutcome {
        if !self.is_running().await {
            return ChatOutcome::Failure(NOT_RUNNING.to_string());
        }
        match self.generate(prompt).await {
            Ok(text) => ChatOutcome::Success(text),
            Err(e) => {
                warn!(error = %e, "Ollama request failed");
                ChatOutcome::from_error(Vendor::Ollama, &e)
            }
        }
    }
}

use super::types::{
    GeminiConfig, GeminiContent, GeminiError, GeminiRequest, GeminiRequestPart, GeminiResponse,
};
use crate::adapter::{ChatAdapter, ChatOutcome};
use crate::error::{Error, Result};
use crate::vendor::Vendor;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Google Gemini adapter
pub struct GeminiAdapter {
    client: Client,
    config: GeminiConfig,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    async fn send_request(&self, api_key: &str, prompt: &str) -> Result<GeminiResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let timeout_ms = self.config.timeout.map_or(0, |t| t.as_millis() as u64);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiRequestPart { text: prompt }],
            }],
        };

        debug!("Sending request to Gemini: {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, timeout_ms))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::from_transport(e, timeout_ms))?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(Error::RateLimit);
            }
            if let Ok(error) = serde_json::from_str::<GeminiError>(&body) {
                return Err(Error::Api(format!(
                    "{}: {}",
                    error.error.status, error.error.message
                )));
            }
            return Err(Error::Api(format!("HTTP {}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String> {
        let response = self.send_request(api_key, prompt).await?;

        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map_or_else(
                    || "No candidates in response".to_string(),
                    |r| format!("prompt blocked ({r})"),
                );
            return Err(Error::InvalidResponse(reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::InvalidResponse("Empty candidate".to_string()));
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl ChatAdapter for GeminiAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Gemini
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn chat(&self, prompt: &str) -> ChatOutcome {
        let Some(api_key) = self.api_key() else {
            return ChatOutcome::not_configured(Vendor::Gemini);
        };
        match self.complete(api_key, prompt).await {
            Ok(text) => ChatOutcome::Success(text),
            Err(e) => {
                warn!(error = %e, "Gemini request failed");
                ChatOutcome::from_error(Vendor::Gemini, &e)
            }
        }
    }
}

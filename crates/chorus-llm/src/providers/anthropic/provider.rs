use super::types::{
    AnthropicConfig, AnthropicError, AnthropicMessage, AnthropicRequest, AnthropicResponse,
    ResponseContentBlock, API_VERSION,
};
use crate::adapter::{ChatAdapter, ChatOutcome};
use crate::error::{Error, Result};
use crate::vendor::Vendor;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Anthropic Claude adapter
pub struct AnthropicAdapter {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicAdapter {
    /// Create a new Anthropic adapter
    pub fn new(config: AnthropicConfig) -> Result<Self> {
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

    /// Send request to Anthropic API
    async fn send_request(&self, api_key: &str, prompt: &str) -> Result<AnthropicResponse> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let timeout_ms = self.config.timeout.map_or(0, |t| t.as_millis() as u64);

        let request = AnthropicRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Sending request to Anthropic: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
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
            if let Ok(error) = serde_json::from_str::<AnthropicError>(&body) {
                return Err(Error::Api(format!(
                    "{}: {}",
                    error.error.error_type, error.error.message
                )));
            }
            return Err(Error::Api(format!("HTTP {}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String> {
        let response = self.send_request(api_key, prompt).await?;

        let text = response
            .content
            .into_iter()
            .find_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text),
                ResponseContentBlock::Other => None,
            })
            .ok_or_else(|| Error::InvalidResponse("No text content in response".to_string()))?;

        Ok(text)
    }
}

#[async_trait::async_trait]
impl ChatAdapter for AnthropicAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Claude
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
            return ChatOutcome::not_configured(Vendor::Claude);
        };
        match self.complete(api_key, prompt).await {
            Ok(text) => ChatOutcome::Success(text),
            Err(e) => {
                warn!(error = %e, "Claude request failed");
                ChatOutcome::from_error(Vendor::Claude, &e)
            }
        }
    }
}

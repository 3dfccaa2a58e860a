//! OpenAI - async-openai adapter
//!
//! One user message per request, first choice wins.

use crate::adapter::{ChatAdapter, ChatOutcome};
use crate::error::{Error, Result};
use crate::util::mask_api_key;
use crate::vendor::Vendor;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequest,
    },
    Client,
};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};


/// Models offered for selection
pub const MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"];

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI adapter configuration
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key; `None` leaves the adapter unconfigured
    pub api_key: Option<String>,
    /// Custom API base (e.g. `https://api.openai.com/v1`)
    pub base_url: Option<String>,
    /// Model identifier
    pub model: String,
    /// Request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Sets a custom base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// OpenAI chat completions adapter
pub struct OpenAiAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    has_key: bool,
}

impl OpenAiAdapter {
    /// Creates a new adapter with the given configuration
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        let api_key = config.api_key.unwrap_or_default();
        let mut openai_config = OpenAIConfig::new().with_api_key(&api_key);

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        // Single attempt: an exhausted backoff turns rate limits into errors
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        Self {
            client: Client::build(http_client, openai_config, backoff),
            model: config.model,
            has_key: !api_key.trim().is_empty(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                name: None,
            }
            .into()],
            ..Default::default()
        };

        debug!("Sending request to OpenAI");

        let response = self.client.chat().create(request).await.map_err(
            |e: async_openai::error::OpenAIError| Error::Api(e.to_string()),
        )?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("No choices in response".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl ChatAdapter for OpenAiAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_configured(&self) -> bool {
        self.has_key
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn chat(&self, prompt: &str) -> ChatOutcome {
        if !self.has_key {
            return ChatOutcome::not_configured(Vendor::OpenAi);
        }
        match self.complete(prompt).await {
            Ok(text) => ChatOutcome::Success(text),
            Err(e) => {
                warn!(error = %e, "OpenAI request failed");
                ChatOutcome::from_error(Vendor::OpenAi, &e)
            }
        }
    }
}

//! Providers - one adapter per vendor
//!
//! [`build_adapter`] turns a vendor tag plus its [`VendorConfig`] into the
//! matching [`ChatAdapter`]. Adapters are cheap and built fresh per dispatch.

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

#[cfg(test)]
mod test_support;

pub use anthropic::{AnthropicAdapter, AnthropicConfig};
pub use gemini::{GeminiAdapter, GeminiConfig};
pub use ollama::{OllamaAdapter, OllamaConfig};
pub use openai::{OpenAiAdapter, OpenAiConfig};

use crate::adapter::ChatAdapter;
use crate::error::Result;
use crate::util::mask_api_key;
use crate::vendor::Vendor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Connection settings for one vendor
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Credential; ignored by the local daemon
    pub api_key: Option<String>,
    /// Model identifier; vendor default when absent
    pub model: Option<String>,
    /// Endpoint override
    pub base_url: Option<String>,
    /// Request timeout in seconds. Remote vendors have none unless set; the
    /// local daemon falls back to its generation timeout.
    pub timeout_secs: Option<u64>,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorConfig")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl VendorConfig {
    /// Settings with a credential
    #[must_use]
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the model
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the endpoint
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout in seconds
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Request timeout, if configured
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Model to use for `vendor`
    #[must_use]
    pub fn model_or_default(&self, vendor: Vendor) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| vendor.default_model())
    }

    /// Whether a non-blank credential is present
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Construct the adapter for `vendor` from its settings
pub fn build_adapter(vendor: Vendor, settings: &VendorConfig) -> Result<Arc<dyn ChatAdapter>> {
    let model = settings.model_or_default(vendor).to_string();
    let api_key = settings.api_key.clone();
    let timeout = settings.timeout();

    let adapter: Arc<dyn ChatAdapter> = match vendor {
        Vendor::OpenAi => {
            let mut config = OpenAiConfig {
                api_key,
                timeout,
                ..OpenAiConfig::default()
            }
            .with_model(model);
            if let Some(url) = &settings.base_url {
                config = config.with_base_url(url);
            }
            Arc::new(OpenAiAdapter::new(config))
        }
        Vendor::Claude => {
            let mut config = AnthropicConfig {
                api_key,
                timeout,
                ..AnthropicConfig::default()
            }
            .with_model(model);
            if let Some(url) = &settings.base_url {
                config = config.with_base_url(url);
            }
            Arc::new(AnthropicAdapter::new(config)?)
        }
        Vendor::Gemini => {
            let mut config = GeminiConfig {
                api_key,
                timeout,
                ..GeminiConfig::default()
            }
            .with_model(model);
            if let Some(url) = &settings.base_url {
                config = config.with_base_url(url);
            }
            Arc::new(GeminiAdapter::new(config)?)
        }
        Vendor::Ollama => {
            let mut config = OllamaConfig::default().with_model(model);
            if let Some(timeout) = timeout {
                config = config.with_timeout(timeout);
            }
            if let Some(url) = &settings.base_url {
                config = config.with_base_url(url);
            }
            Arc::new(OllamaAdapter::new(config)?)
        }
    };

    Ok(adapter)
}

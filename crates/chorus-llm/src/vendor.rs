//! Vendor identity
//!
//! The closed set of vendors an adapter can bind to. Configuration keys and
//! pricing lookups both go through [`Vendor::from_key`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// LLM vendor tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    /// OpenAI chat completions
    OpenAi,
    /// Anthropic Claude messages API
    Claude,
    /// Google Gemini generateContent API
    Gemini,
    /// Local Ollama daemon
    Ollama,
}

impl Vendor {
    /// Every vendor, in display order
    pub const ALL: [Vendor; 4] = [Vendor::OpenAi, Vendor::Claude, Vendor::Gemini, Vendor::Ollama];

    /// Parse a configuration / pricing key (case-insensitive).
    ///
    /// `anthropic` and `google` are accepted as aliases.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "claude" | "anthropic" => Some(Self::Claude),
            "gemini" | "google" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Canonical lowercase key (pricing table and ledger key)
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }

    /// Human-facing name, used to key dispatch results
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Claude => "Claude",
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
        }
    }

    /// Whether this vendor is a local daemon rather than a remote API
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Ollama)
    }

    /// Model used when the configuration names none
    #[must_use]
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => crate::providers::openai::DEFAULT_MODEL,
            Self::Claude => crate::providers::anthropic::DEFAULT_MODEL,
            Self::Gemini => crate::providers::gemini::DEFAULT_MODEL,
            Self::Ollama => crate::providers::ollama::DEFAULT_MODEL,
        }
    }

    /// Models offered for selection
    #[must_use]
    pub fn suggested_models(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => crate::providers::openai::MODELS,
            Self::Claude => crate::providers::anthropic::MODELS,
            Self::Gemini => crate::providers::gemini::MODELS,
            Self::Ollama => crate::providers::ollama::SUGGESTED_MODELS,
        }
    }

    /// Conventional environment variable holding the credential
    #[must_use]
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Claude => Some("ANTHROPIC_API_KEY"),
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::Ollama => None,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Vendor {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| crate::Error::NotConfigured(format!("unknown vendor: {s}")))
    }
}

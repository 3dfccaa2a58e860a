//! Error types for chorus-core
//!
//! Adapter failures never show up here; they are results, not errors.
//! What remains is the zero-provider condition and configuration mistakes.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// No adapter was both configured and reachable
    #[error("no providers configured")]
    NoProviders,

    /// Invalid configuration
    #[error("invalid configuration: {field}: {message}")]
    InvalidConfig {
        /// Config field name
        field: String,
        /// Detailed message
        message: String,
    },

    /// Export failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Adapter construction error
    #[error("llm error: {0}")]
    Llm(#[from] chorus_llm::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::NoProviders => "🔑 No providers configured.".to_string(),
            Error::InvalidConfig { field, message } => {
                format!("⚙️ Configuration error in '{}': {}", field, message)
            }
            Error::Serialization(e) => format!("📄 Export failed: {}", e),
            Error::Llm(e) => format!("🤖 LLM error: {}", e),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::NoProviders => Some(
                "💡 Set OPENAI_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY, \
                 or start a local model with `ollama serve`."
                    .to_string(),
            ),
            Error::InvalidConfig { field, .. } => Some(format!(
                "💡 Check the '{}' setting in config/default.toml or .env file.",
                field
            )),
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();

    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }

    output
}

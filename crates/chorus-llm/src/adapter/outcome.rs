//! Chat outcome and the failure-sentinel wire convention

use crate::error::Error;
use crate::util::sanitize_api_error;
use crate::vendor::Vendor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a failed result in its string form
pub const FAILURE_SENTINEL: &str = "❌";

/// Result of one `chat` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ChatOutcome {
    /// The model's answer
    Success(String),
    /// Human-readable reason the call did not succeed
    Failure(String),
}

impl ChatOutcome {
    /// Build a failure from an adapter error, as `"<Vendor> Error: <reason>"`
    #[must_use]
    pub fn from_error(vendor: Vendor, error: &Error) -> Self {
        let reason = match error {
            Error::Api(msg) => sanitize_api_error(msg),
            Error::RateLimit => "API rate limit exceeded. Please try again later.".to_string(),
            other => sanitize_api_error(&other.to_string()),
        };
        Self::Failure(format!("{} Error: {}", vendor.display_name(), reason))
    }

    /// Failure reported when `chat` is reached without a credential
    #[must_use]
    pub fn not_configured(vendor: Vendor) -> Self {
        Self::Failure(format!(
            "{} not configured. Add an API key to enable it.",
            vendor.display_name()
        ))
    }

    /// Whether this is a successful answer
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Answer text, if successful
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            Self::Failure(_) => None,
        }
    }

    /// Failure reason, if failed
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(reason) => Some(reason),
        }
    }

    /// String form used at the outer boundary
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::Success(text) => text.clone(),
            Self::Failure(reason) => format!("{FAILURE_SENTINEL} {reason}"),
        }
    }

    /// Parse the string form back; anything sentinel-prefixed is a failure
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw.strip_prefix(FAILURE_SENTINEL) {
            Some(reason) => Self::Failure(reason.trim_start().to_string()),
            None => Self::Success(raw.to_string()),
        }
    }
}

impl fmt::Display for ChatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_wire_form_starts_with_sentinel() {
        let outcome = ChatOutcome::from_error(Vendor::OpenAi, &Error::Network("refused".into()));
        let wire = outcome.to_wire();
        assert!(wire.starts_with(FAILURE_SENTINEL));
        assert!(wire.contains("OpenAI Error"));
        assert!(wire.contains("refused"));
    }

    #[test]
    fn test_success_wire_form_is_plain_text() {
        let outcome = ChatOutcome::Success("Paris".to_string());
        assert_eq!(outcome.to_wire(), "Paris");
        assert_eq!(outcome.text(), Some("Paris"));
        assert!(outcome.failure_reason().is_none());
    }

    #[test]
    fn test_from_wire_partitions_on_sentinel() {
        assert!(ChatOutcome::from_wire("hello").is_success());

        let failed = ChatOutcome::from_wire("❌ Gemini Error: boom");
        assert_eq!(failed.failure_reason(), Some("Gemini Error: boom"));
    }

    #[test]
    fn test_auth_errors_are_sanitized() {
        let outcome = ChatOutcome::from_error(
            Vendor::Claude,
            &Error::Api("authentication_error: invalid x-api-key sk-ant-123".into()),
        );
        let reason = outcome.failure_reason().unwrap_or_default();
        assert!(!reason.contains("sk-ant"));
        assert!(reason.starts_with("Claude Error:"));
    }

    #[test]
    fn test_not_configured_names_vendor() {
        let outcome = ChatOutcome::not_configured(Vendor::Gemini);
        assert!(outcome.to_wire().starts_with("❌ Gemini not configured"));
    }
}

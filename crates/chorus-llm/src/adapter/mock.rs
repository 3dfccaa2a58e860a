//! Mock adapter for testing
//!
//! Returns a fixed outcome and counts how often it was asked.

use super::{ChatAdapter, ChatOutcome};
use crate::vendor::Vendor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A scripted adapter: fixed configuration state, fixed outcome.
pub struct MockAdapter {
    vendor: Vendor,
    model: String,
    configured: bool,
    outcome: ChatOutcome,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockAdapter {
    /// Configured adapter that answers `text`
    #[must_use]
    pub fn answering(vendor: Vendor, model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            vendor,
            model: model.into(),
            configured: true,
            outcome: ChatOutcome::Success(text.into()),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configured adapter that fails with `reason`
    #[must_use]
    pub fn failing(vendor: Vendor, model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            outcome: ChatOutcome::Failure(reason.into()),
            ..Self::answering(vendor, model, "")
        }
    }

    /// Adapter that reports "not configured"
    #[must_use]
    pub fn unconfigured(vendor: Vendor, model: impl Into<String>) -> Self {
        Self {
            configured: false,
            ..Self::answering(vendor, model, "unreachable")
        }
    }

    /// Delay every answer, to exercise concurrent dispatch
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared counter of `chat` invocations
    #[must_use]
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl ChatAdapter for MockAdapter {
    fn vendor(&self) -> Vendor {
        self.vendor
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_configured(&self) -> bool {
        self.configured
    }

    async fn chat(&self, _prompt: &str) -> ChatOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

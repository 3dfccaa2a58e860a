//! Session - the explicit per-user context
//!
//! Holds everything that accumulates across dispatch cycles: the usage
//! ledger, the transcript and the interaction log. Nothing here is global;
//! callers own a `Session` and pass it where it is needed.

use crate::dispatch::{DispatchReport, Dispatcher};
use crate::error::Result;
use crate::transcript::Transcript;
use chorus_llm::{PricingTable, Savings, UsageLedger, UsageSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use uuid::Uuid;

/// Characters of the prompt kept in the interaction log
pub const PROMPT_PREVIEW_CHARS: usize = 100;

/// Interaction log record for one dispatch cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// When the cycle was recorded
    pub timestamp: DateTime<Utc>,
    /// First characters of the prompt
    pub prompt_preview: String,
    /// Prompt length in characters
    pub prompt_length: usize,
    /// Ledger keys of vendors that answered
    pub vendors: Vec<String>,
    /// Input + output tokens per answering vendor
    pub tokens_used: BTreeMap<String, u64>,
    /// Cost of this cycle in USD
    pub cost: f64,
}

/// Aggregate view of the interaction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Number of recorded cycles
    pub total_interactions: usize,
    /// Ledger total in USD
    pub total_cost: f64,
    /// Distinct vendors that answered at least once
    pub vendors_used: BTreeSet<String>,
    /// Whole minutes since the session started
    pub duration_minutes: i64,
}

/// Per-user dispatch context
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    ledger: UsageLedger,
    transcript: Transcript,
    interactions: Vec<Interaction>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// New session priced with the built-in table
    #[must_use]
    pub fn new() -> Self {
        Self::with_ledger(UsageLedger::new())
    }

    /// New session priced with a custom table
    #[must_use]
    pub fn with_pricing(pricing: PricingTable) -> Self {
        Self::with_ledger(UsageLedger::with_pricing(pricing))
    }

    fn with_ledger(ledger: UsageLedger) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            ledger,
            transcript: Transcript::new(),
            interactions: Vec::new(),
        }
    }

    /// Session ID
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session started (or was last reset)
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Usage ledger
    #[must_use]
    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    /// Conversation transcript
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Mutable transcript, for `clear`
    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Interaction log, oldest first
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Run one dispatch cycle and fold its results into this session
    ///
    /// Successful results are re-priced with this session's table, so the
    /// report's costs always match what the ledger records.
    pub async fn ask(&mut self, dispatcher: &Dispatcher, prompt: &str) -> Result<DispatchReport> {
        let mut report = dispatcher.dispatch(prompt).await?;
        self.reprice(&mut report);
        self.record(&report);
        Ok(report)
    }

    fn reprice(&self, report: &mut DispatchReport) {
        let pricing = self.ledger.pricing();
        for result in report.results.iter_mut().filter(|r| r.is_success()) {
            result.cost = pricing
                .lookup(&result.model, result.vendor.key())
                .calculate_cost(result.input_tokens, result.output_tokens);
        }
    }

    /// Fold a finished dispatch cycle into the session.
    ///
    /// Only successful results reach the ledger. Every result, failed or
    /// not, goes into the transcript.
    pub fn record(&mut self, report: &DispatchReport) -> &Interaction {
        let mut vendors = Vec::new();
        let mut tokens_used = BTreeMap::new();
        let mut cost = 0.0;

        for result in report.successes() {
            let tracked = self.ledger.record(
                result.vendor.key(),
                &result.model,
                result.input_tokens,
                result.output_tokens,
            );
            cost += tracked.cost;
            *tokens_used.entry(tracked.vendor.clone()).or_insert(0) +=
                tracked.input_tokens + tracked.output_tokens;
            if !vendors.contains(&tracked.vendor) {
                vendors.push(tracked.vendor);
            }
        }

        self.transcript.add(report.prompt.clone(), report.to_wire_map());

        debug!(session_id = %self.id, cost, vendors = ?vendors, "Cycle recorded");

        self.interactions.push(Interaction {
            timestamp: Utc::now(),
            prompt_preview: report.prompt.chars().take(PROMPT_PREVIEW_CHARS).collect(),
            prompt_length: report.prompt.chars().count(),
            vendors,
            tokens_used,
            cost,
        });
        &self.interactions[self.interactions.len() - 1]
    }

    /// Ledger total in USD
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.ledger.get_total_cost()
    }

    /// Ledger snapshot
    #[must_use]
    pub fn summary(&self) -> UsageSummary {
        self.ledger.get_summary()
    }

    /// Savings versus the priciest bucket
    #[must_use]
    pub fn savings(&self) -> Savings {
        self.ledger.get_savings_vs_most_expensive()
    }

    /// Aggregate interaction log stats
    #[must_use]
    pub fn session_stats(&self) -> SessionStats {
        SessionStats {
            total_interactions: self.interactions.len(),
            total_cost: self.ledger.get_total_cost(),
            vendors_used: self
                .interactions
                .iter()
                .flat_map(|i| i.vendors.iter().cloned())
                .collect(),
            duration_minutes: (Utc::now() - self.started_at).num_minutes(),
        }
    }

    /// Clear ledger, transcript and interaction log
    pub fn reset(&mut self) {
        info!(session_id = %self.id, "Session reset");
        self.ledger.reset();
        self.transcript.clear();
        self.interactions.clear();
        self.started_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use chorus_llm::{ChatAdapter, MockAdapter, PricingEntry, Vendor};
    use std::sync::Arc;

    fn dispatcher(adapters: Vec<MockAdapter>) -> Dispatcher {
        Dispatcher::with_adapters(
            adapters
                .into_iter()
                .map(|a| Arc::new(a) as Arc<dyn ChatAdapter>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_all_failures_leave_ledger_untouched() {
        let dispatcher = dispatcher(vec![
            MockAdapter::failing(Vendor::OpenAi, "gpt-4o", "OpenAI Error: boom"),
            MockAdapter::failing(Vendor::Claude, "claude-3-opus-20240229", "Claude Error: boom"),
        ]);
        let mut session = Session::new();

        let report = session.ask(&dispatcher, "hello").await.unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(session.total_cost(), 0.0);
        assert!(session.ledger().is_empty());
        assert_eq!(session.transcript().len(), 1);
        assert!(session.interactions()[0].vendors.is_empty());
    }

    #[tokio::test]
    async fn test_only_successes_are_tracked() {
        let dispatcher = dispatcher(vec![
            MockAdapter::answering(Vendor::OpenAi, "gpt-4o-mini", "Paris is the capital of France."),
            MockAdapter::failing(Vendor::Claude, "claude-3-5-sonnet-20241022", "Claude Error: boom"),
            MockAdapter::failing(Vendor::Gemini, "gemini-1.5-pro", "Gemini Error: boom"),
        ]);
        let mut session = Session::new();

        let report = session.ask(&dispatcher, "What is the capital of France?").await.unwrap();

        assert_eq!(report.to_wire_map().len(), 3);
        assert!(session.total_cost() > 0.0);
        assert_eq!(session.ledger().total_requests(), 1);
        assert!((session.total_cost() - report.cycle_cost()).abs() < 1e-15);

        let interaction = &session.interactions()[0];
        assert_eq!(interaction.vendors, vec!["openai".to_string()]);
        assert!(interaction.tokens_used["openai"] > 0);
    }

    #[tokio::test]
    async fn test_report_costs_follow_session_pricing() {
        // The dispatcher prices with the built-in table (local model free),
        // the session with an override that charges for it.
        let dispatcher = dispatcher(vec![MockAdapter::answering(
            Vendor::Ollama,
            "llama3.2",
            "A locally generated answer that is long enough to count.",
        )]);
        let pricing = PricingTable::builtin().with_override(
            Vendor::Ollama,
            "llama3.2",
            PricingEntry::new(2.0, 4.0),
        );
        let mut session = Session::with_pricing(pricing);

        let report = session
            .ask(&dispatcher, "Does the local model cost anything here?")
            .await
            .unwrap();

        assert!(report.cycle_cost() > 0.0);
        assert!((report.cycle_cost() - session.total_cost()).abs() < 1e-15);
        assert!((report.cycle_cost() - session.interactions()[0].cost).abs() < 1e-15);
    }

    #[tokio::test]
    async fn test_repeated_cycles_accumulate() {
        let dispatcher = dispatcher(vec![MockAdapter::answering(
            Vendor::OpenAi,
            "gpt-4o",
            "Borrowing lets code use a value without taking ownership.",
        )]);
        let mut session = Session::new();

        session.ask(&dispatcher, "Explain borrowing in Rust").await.unwrap();
        let after_one = session.total_cost();
        session.ask(&dispatcher, "Explain lifetimes in Rust").await.unwrap();

        let bucket = session.ledger().bucket("openai", "gpt-4o").unwrap();
        assert_eq!(bucket.requests, 2);
        assert!(session.total_cost() > after_one);
        assert_eq!(session.session_stats().total_interactions, 2);
    }

    #[tokio::test]
    async fn test_no_providers_records_nothing() {
        let dispatcher = dispatcher(vec![MockAdapter::unconfigured(Vendor::OpenAi, "gpt-4o")]);
        let mut session = Session::new();

        assert!(session.ask(&dispatcher, "hello").await.is_err());
        assert!(session.transcript().is_empty());
        assert!(session.interactions().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_preview_is_truncated() {
        let dispatcher = dispatcher(vec![MockAdapter::answering(Vendor::Ollama, "llama3.2", "ok")]);
        let mut session = Session::new();
        let prompt = "é".repeat(250);

        session.ask(&dispatcher, &prompt).await.unwrap();

        let interaction = &session.interactions()[0];
        assert_eq!(interaction.prompt_preview.chars().count(), PROMPT_PREVIEW_CHARS);
        assert_eq!(interaction.prompt_length, 250);
        assert_eq!(interaction.cost, 0.0);
    }

    #[tokio::test]
    async fn test_session_stats_and_reset() {
        let dispatcher = dispatcher(vec![
            MockAdapter::answering(Vendor::OpenAi, "gpt-4o", "The answer is forty-two."),
            MockAdapter::answering(Vendor::Ollama, "llama3.2", "Forty-two, probably."),
        ]);
        let mut session = Session::new();
        session.ask(&dispatcher, "What is the answer to everything?").await.unwrap();
        session.ask(&dispatcher, "Are you sure about that answer?").await.unwrap();

        let stats = session.session_stats();
        assert_eq!(stats.total_interactions, 2);
        assert_eq!(
            stats.vendors_used.into_iter().collect::<Vec<_>>(),
            vec!["ollama".to_string(), "openai".to_string()]
        );
        assert_eq!(stats.duration_minutes, 0);
        assert!(session.savings().amount > 0.0);

        session.reset();
        assert_eq!(session.total_cost(), 0.0);
        assert!(session.transcript().is_empty());
        assert_eq!(session.session_stats().total_interactions, 0);
        assert_eq!(session.summary().total_requests(), 0);
    }
}

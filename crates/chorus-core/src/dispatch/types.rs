//! Dispatch result types

use chorus_llm::{ChatOutcome, Vendor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of invoking one adapter for one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Vendor
    pub vendor: Vendor,
    /// Model identifier
    pub model: String,
    /// Answer or failure reason
    pub outcome: ChatOutcome,
    /// Estimated input tokens (0 on failure)
    pub input_tokens: u64,
    /// Estimated output tokens (0 on failure)
    pub output_tokens: u64,
    /// Cost in USD (0 on failure)
    pub cost: f64,
    /// Wall-clock time of the call
    pub latency_ms: u64,
}

impl DispatchResult {
    /// A failed call; no tokens, no cost
    #[must_use]
    pub fn failed(vendor: Vendor, model: impl Into<String>, outcome: ChatOutcome, latency_ms: u64) -> Self {
        Self {
            vendor,
            model: model.into(),
            outcome,
            input_tokens: 0,
            output_tokens: 0,
            cost: 0.0,
            latency_ms,
        }
    }

    /// Whether the call succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Name the result is keyed by
    #[must_use]
    pub fn vendor_name(&self) -> &'static str {
        self.vendor.display_name()
    }
}

/// Every result of one dispatch cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// The prompt that was sent
    pub prompt: String,
    /// One result per attempted adapter
    pub results: Vec<DispatchResult>,
    /// Wall-clock time of the whole cycle
    pub elapsed_ms: u64,
}

impl DispatchReport {
    /// Results that succeeded
    pub fn successes(&self) -> impl Iterator<Item = &DispatchResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    /// Results that failed
    pub fn failures(&self) -> impl Iterator<Item = &DispatchResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Result for a vendor, by display name or key
    #[must_use]
    pub fn get(&self, vendor: &str) -> Option<&DispatchResult> {
        let vendor = Vendor::from_key(vendor)?;
        self.results.iter().find(|r| r.vendor == vendor)
    }

    /// Sum of the successful results' costs
    #[must_use]
    pub fn cycle_cost(&self) -> f64 {
        self.successes().map(|r| r.cost).sum()
    }

    /// `{vendor_name: result_string}` with failures sentinel-prefixed.
    ///
    /// A second adapter for an already-present vendor is keyed
    /// `"<Vendor> (<model>)"`.
    #[must_use]
    pub fn to_wire_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for result in &self.results {
            let mut key = result.vendor_name().to_string();
            if map.contains_key(&key) {
                key = format!("{} ({})", result.vendor_name(), result.model);
            }
            map.insert(key, result.outcome.to_wire());
        }
        map
    }
}

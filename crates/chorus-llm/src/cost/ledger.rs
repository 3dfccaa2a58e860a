//! Usage Ledger - session-scoped token and cost accumulation
//!
//! The ledger has a single owner and takes `&mut self` for updates; callers
//! that fan out to vendors concurrently fold results in afterwards.

use super::pricing::{builtin_table, PricingTable};
use crate::token::estimate_tokens;
use crate::vendor::Vendor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Accumulated usage for one (vendor, model) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerBucket {
    /// Total input tokens
    pub input_tokens: u64,
    /// Total output tokens
    pub output_tokens: u64,
    /// Total cost in USD
    pub cost: f64,
    /// Number of tracked exchanges
    pub requests: u64,
}

impl LedgerBucket {
    /// Average cost of one request (zero when empty)
    #[must_use]
    pub fn average_cost(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.cost / self.requests as f64
        }
    }
}

/// Token counts and cost attributed to a single exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedExchange {
    /// Ledger key of the vendor
    pub vendor: String,
    /// Model identifier
    pub model: String,
    /// Input tokens
    pub input_tokens: u64,
    /// Output tokens
    pub output_tokens: u64,
    /// Cost in USD
    pub cost: f64,
}

/// Snapshot of the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    /// Total cost across all buckets
    pub total_cost: f64,
    /// vendor -> model -> bucket
    pub by_vendor: BTreeMap<String, BTreeMap<String, LedgerBucket>>,
}

impl UsageSummary {
    /// Total exchanges across all buckets
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.buckets().map(|(_, _, b)| b.requests).sum()
    }

    /// Iterate `(vendor, model, bucket)` in key order
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &str, &LedgerBucket)> {
        self.by_vendor.iter().flat_map(|(vendor, models)| {
            models
                .iter()
                .map(move |(model, bucket)| (vendor.as_str(), model.as_str(), bucket))
        })
    }
}

/// Result of the "savings versus most expensive" metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    /// USD saved compared to sending every request to the priciest bucket
    pub amount: f64,
    /// `vendor/model` of the priciest bucket, if any bucket cost anything
    pub most_expensive: Option<String>,
}

/// Per-session usage ledger
#[derive(Debug, Clone)]
pub struct UsageLedger {
    pricing: PricingTable,
    usage: BTreeMap<String, BTreeMap<String, LedgerBucket>>,
    // (vendor, model) in the order buckets were first created
    order: Vec<(String, String)>,
    total_cost: f64,
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageLedger {
    /// Empty ledger priced with the built-in table
    #[must_use]
    pub fn new() -> Self {
        Self::with_pricing(builtin_table().clone())
    }

    /// Empty ledger priced with a custom table
    #[must_use]
    pub fn with_pricing(pricing: PricingTable) -> Self {
        Self {
            pricing,
            usage: BTreeMap::new(),
            order: Vec::new(),
            total_cost: 0.0,
        }
    }

    /// Pricing table in use
    #[must_use]
    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Estimate tokens for both sides of an exchange and record it
    pub fn track(&mut self, vendor: &str, model: &str, prompt: &str, response: &str) -> TrackedExchange {
        let input_tokens = estimate_tokens(prompt, model);
        let output_tokens = estimate_tokens(response, model);
        self.record(vendor, model, input_tokens, output_tokens)
    }

    /// Record an exchange with known token counts
    pub fn record(
        &mut self,
        vendor: &str,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
    ) -> TrackedExchange {
        let vendor_key = ledger_key(vendor);
        let cost = self
            .pricing
            .lookup(model, &vendor_key)
            .calculate_cost(input_tokens, output_tokens);

        let models = self.usage.entry(vendor_key.clone()).or_default();
        if !models.contains_key(model) {
            self.order.push((vendor_key.clone(), model.to_string()));
        }
        let bucket = models.entry(model.to_string()).or_default();
        bucket.input_tokens += input_tokens;
        bucket.output_tokens += output_tokens;
        bucket.cost += cost;
        bucket.requests += 1;
        self.total_cost += cost;

        debug!(
            vendor = %vendor_key,
            model = %model,
            input_tokens,
            output_tokens,
            cost,
            "Exchange tracked"
        );

        TrackedExchange {
            vendor: vendor_key,
            model: model.to_string(),
            input_tokens,
            output_tokens,
            cost,
        }
    }

    /// Sum of all recorded costs
    #[must_use]
    pub fn get_total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Total tracked exchanges
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.usage
            .values()
            .flat_map(BTreeMap::values)
            .map(|b| b.requests)
            .sum()
    }

    /// One bucket, if anything was recorded for it
    #[must_use]
    pub fn bucket(&self, vendor: &str, model: &str) -> Option<&LedgerBucket> {
        self.usage.get(&ledger_key(vendor))?.get(model)
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }

    /// Snapshot of totals and per-bucket usage
    #[must_use]
    pub fn get_summary(&self) -> UsageSummary {
        UsageSummary {
            total_cost: self.total_cost,
            by_vendor: self.usage.clone(),
        }
    }

    /// How much cheaper the session was than routing every request to the
    /// bucket with the highest accumulated cost.
    ///
    /// With fewer than two buckets there is nothing to compare and the amount
    /// is zero. Ties keep the bucket recorded first.
    #[must_use]
    pub fn get_savings_vs_most_expensive(&self) -> Savings {
        let mut bucket_count = 0usize;
        let mut priciest: Option<(String, &LedgerBucket)> = None;

        for (vendor, model) in &self.order {
            let Some(bucket) = self.bucket(vendor, model) else {
                continue;
            };
            bucket_count += 1;
            let beats = priciest
                .as_ref()
                .map_or(true, |(_, best)| bucket.cost > best.cost);
            if beats {
                priciest = Some((format!("{vendor}/{model}"), bucket));
            }
        }

        let Some((name, bucket)) = priciest.filter(|(_, b)| b.cost > 0.0) else {
            return Savings::default();
        };

        if bucket_count < 2 {
            return Savings {
                amount: 0.0,
                most_expensive: Some(name),
            };
        }

        let hypothetical = bucket.average_cost() * self.total_requests() as f64;
        Savings {
            amount: (hypothetical - self.total_cost).max(0.0),
            most_expensive: Some(name),
        }
    }

    /// Drop every bucket and zero the total
    pub fn reset(&mut self) {
        self.usage.clear();
        self.order.clear();
        self.total_cost = 0.0;
    }
}

/// Canonical vendor key; aliases collapse, unknown names are lowercased
fn ledger_key(vendor: &str) -> String {
    Vendor::from_key(vendor)
        .map(|v| v.key().to_string())
        .unwrap_or_else(|| vendor.trim().to_ascii_lowercase())
}

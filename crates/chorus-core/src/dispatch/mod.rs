//! Dispatch - fan one prompt out to every available adapter
//!
//! # Module Structure
//!
//! - `config`: Symbolic vendor map and its resolution
//! - `types`: Per-adapter results and the cycle report
//!
//! Adapters are checked concurrently, then every adapter that reported
//! itself configured is asked concurrently. Results keep their vendor tag,
//! so completion order never changes the report. Token estimates and costs
//! are computed once every call has returned, off the fan-out. The dispatcher holds no
//! mutable state; accounting happens afterwards in
//! [`crate::Session::record`].

mod config;
mod types;

#[cfg(test)]
mod tests;

pub use config::DispatchConfig;
pub use types::{DispatchReport, DispatchResult};

use crate::error::{Error, Result};
use chorus_llm::{
    build_adapter, estimate_tokens, token, ChatAdapter, ChatOutcome, PricingTable, Vendor,
};
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Runs dispatch cycles over a fixed set of adapters
pub struct Dispatcher {
    adapters: Vec<Arc<dyn ChatAdapter>>,
    pricing: PricingTable,
}

impl Dispatcher {
    /// Build adapters for every vendor in `config`
    pub fn from_config(config: &DispatchConfig) -> Result<Self> {
        let adapters = config
            .resolve()?
            .into_iter()
            .map(|(vendor, settings)| build_adapter(vendor, &settings).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::with_adapters(adapters))
    }

    /// Dispatch over pre-built adapters.
    ///
    /// Tokenizers for the adapters' models are loaded here, not mid-dispatch.
    #[must_use]
    pub fn with_adapters(adapters: Vec<Arc<dyn ChatAdapter>>) -> Self {
        for adapter in &adapters {
            token::preload(adapter.model());
        }
        Self {
            adapters,
            pricing: PricingTable::builtin(),
        }
    }

    /// Price results with a custom table
    #[must_use]
    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }

    /// All adapters, configured or not
    #[must_use]
    pub fn adapters(&self) -> &[Arc<dyn ChatAdapter>] {
        &self.adapters
    }

    /// Adapters whose `is_configured` check passes right now
    pub async fn available(&self) -> Vec<Arc<dyn ChatAdapter>> {
        let checks = join_all(self.adapters.iter().map(|a| a.is_configured())).await;

        self.adapters
            .iter()
            .zip(checks)
            .filter_map(|(adapter, ok)| {
                if !ok {
                    debug!(vendor = %adapter.vendor(), "Skipping unconfigured adapter");
                }
                ok.then(|| Arc::clone(adapter))
            })
            .collect()
    }

    /// Send `prompt` to every available adapter.
    ///
    /// Individual failures are results. Only "nothing available" is an error.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn dispatch(&self, prompt: &str) -> Result<DispatchReport> {
        let start = Instant::now();
        let available = self.available().await;

        if available.is_empty() {
            warn!("No configured or reachable providers");
            return Err(Error::NoProviders);
        }

        info!(
            vendors = ?available.iter().map(|a| a.vendor().key()).collect::<Vec<_>>(),
            "Dispatching prompt"
        );

        let calls = join_all(available.iter().map(|adapter| invoke(adapter.as_ref(), prompt))).await;
        let results = calls.into_iter().map(|call| self.price(prompt, call)).collect();

        let report = DispatchReport {
            prompt: prompt.to_string(),
            results,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            succeeded = report.successes().count(),
            failed = report.failures().count(),
            elapsed_ms = report.elapsed_ms,
            "Dispatch complete"
        );

        Ok(report)
    }

    fn price(&self, prompt: &str, call: Call) -> DispatchResult {
        let Call {
            vendor,
            model,
            outcome,
            latency_ms,
        } = call;

        let text = match outcome {
            ChatOutcome::Success(text) => text,
            failure => {
                debug!(vendor = %vendor, latency_ms, "Adapter failed");
                return DispatchResult::failed(vendor, model, failure, latency_ms);
            }
        };

        let input_tokens = estimate_tokens(prompt, &model);
        let output_tokens = estimate_tokens(&text, &model);
        let cost = self
            .pricing
            .lookup(&model, vendor.key())
            .calculate_cost(input_tokens, output_tokens);

        debug!(vendor = %vendor, latency_ms, input_tokens, output_tokens, cost, "Adapter answered");

        DispatchResult {
            vendor,
            model,
            outcome: ChatOutcome::Success(text),
            input_tokens,
            output_tokens,
            cost,
            latency_ms,
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field(
                "adapters",
                &self
                    .adapters
                    .iter()
                    .map(|a| format!("{}/{}", a.vendor().key(), a.model()))
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// One finished `chat` call, not yet priced
struct Call {
    vendor: Vendor,
    model: String,
    outcome: ChatOutcome,
    latency_ms: u64,
}

async fn invoke(adapter: &dyn ChatAdapter, prompt: &str) -> Call {
    let start = Instant::now();
    let outcome = adapter.chat(prompt).await;

    Call {
        vendor: adapter.vendor(),
        model: adapter.model().to_string(),
        outcome,
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

//! Chorus LLM - vendor adapters and cost accounting
//!
//! This crate provides the leaves of Chorus:
//! - Adapter: the two-operation `ChatAdapter` surface and its tagged result
//! - Providers: OpenAI, Anthropic Claude, Google Gemini and local Ollama
//! - Token: tokenizer-backed or ratio-based token estimation
//! - Cost: pricing table, cost calculator and the session usage ledger

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod cost;
pub mod error;
pub mod providers;
pub mod token;
pub mod util;
pub mod vendor;

pub use adapter::{ChatAdapter, ChatOutcome, MockAdapter, FAILURE_SENTINEL};
pub use cost::{
    calculate_cost, get_pricing_info, LedgerBucket, PricingEntry, PricingTable, Savings,
    TrackedExchange, UsageLedger, UsageSummary,
};
pub use error::{Error, Result};
pub use providers::{build_adapter, VendorConfig};
pub use token::estimate_tokens;
pub use vendor::Vendor;

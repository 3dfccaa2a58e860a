//! Cost Tracking - pricing, per-exchange cost and the session usage ledger
//!
//! # Module Structure
//!
//! - `pricing`: Static (vendor, model) rate table and lookups
//! - `calculator`: Token counts to USD for one exchange
//! - `ledger`: Session-scoped accumulation and savings metric

mod calculator;
mod ledger;
mod pricing;


pub use calculator::calculate_cost;
pub use ledger::{LedgerBucket, Savings, TrackedExchange, UsageLedger, UsageSummary};
pub use pricing::{builtin_table, get_pricing_info, PricingEntry, PricingTable, DEFAULT_MODEL_KEY};

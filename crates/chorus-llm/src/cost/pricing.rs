//! Model Pricing - static USD-per-million-token rates
//!
//! Lookups never fail: an unknown model falls back to the vendor's
//! `_default` entry, an unknown vendor is free.

use crate::vendor::Vendor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Key of the per-vendor fallback entry
pub const DEFAULT_MODEL_KEY: &str = "_default";

// ============================================================================
// Pricing Constants (per 1M tokens, USD)
// ============================================================================

/// GPT-4o input cost per 1M tokens
pub const GPT4O_INPUT_COST: f64 = 2.50;
/// GPT-4o output cost per 1M tokens
pub const GPT4O_OUTPUT_COST: f64 = 10.00;
/// GPT-4o-mini input cost per 1M tokens
pub const GPT4O_MINI_INPUT_COST: f64 = 0.150;
/// GPT-4o-mini output cost per 1M tokens
pub const GPT4O_MINI_OUTPUT_COST: f64 = 0.600;
/// GPT-4 Turbo input cost per 1M tokens
pub const GPT4_TURBO_INPUT_COST: f64 = 10.00;
/// GPT-4 Turbo output cost per 1M tokens
pub const GPT4_TURBO_OUTPUT_COST: f64 = 30.00;
/// GPT-3.5 Turbo input cost per 1M tokens
pub const GPT35_TURBO_INPUT_COST: f64 = 0.50;
/// GPT-3.5 Turbo output cost per 1M tokens
pub const GPT35_TURBO_OUTPUT_COST: f64 = 1.50;

/// Claude 3.5 Sonnet input cost per 1M tokens
pub const CLAUDE_SONNET35_INPUT_COST: f64 = 3.00;
/// Claude 3.5 Sonnet output cost per 1M tokens
pub const CLAUDE_SONNET35_OUTPUT_COST: f64 = 15.00;
/// Claude 3.5 Haiku input cost per 1M tokens
pub const CLAUDE_HAIKU35_INPUT_COST: f64 = 0.80;
/// Claude 3.5 Haiku output cost per 1M tokens
pub const CLAUDE_HAIKU35_OUTPUT_COST: f64 = 4.00;
/// Claude 3 Opus input cost per 1M tokens
pub const CLAUDE_OPUS3_INPUT_COST: f64 = 15.00;
/// Claude 3 Opus output cost per 1M tokens
pub const CLAUDE_OPUS3_OUTPUT_COST: f64 = 75.00;

/// Gemini 1.5 Pro input cost per 1M tokens
pub const GEMINI_PRO15_INPUT_COST: f64 = 1.25;
/// Gemini 1.5 Pro output cost per 1M tokens
pub const GEMINI_PRO15_OUTPUT_COST: f64 = 5.00;
/// Gemini 1.5 Flash input cost per 1M tokens
pub const GEMINI_FLASH15_INPUT_COST: f64 = 0.075;
/// Gemini 1.5 Flash output cost per 1M tokens
pub const GEMINI_FLASH15_OUTPUT_COST: f64 = 0.30;

// ============================================================================
// Pricing Entry
// ============================================================================

/// Input/output rate pair, USD per one million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    /// Cost per 1M input tokens
    pub input: f64,
    /// Cost per 1M output tokens
    pub output: f64,
}

impl PricingEntry {
    /// Zero-cost entry
    pub const FREE: Self = Self {
        input: 0.0,
        output: 0.0,
    };

    /// Create an entry; negative or NaN rates are clamped to zero
    #[must_use]
    pub fn new(input: f64, output: f64) -> Self {
        Self {
            input: input.max(0.0),
            output: output.max(0.0),
        }
    }

    /// Calculate cost for given token counts
    #[must_use]
    pub fn calculate_cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        let input_cost = (input_tokens as f64 / 1_000_000.0) * self.input;
        let output_cost = (output_tokens as f64 / 1_000_000.0) * self.output;
        input_cost + output_cost
    }

    /// Whether both rates are zero
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.input == 0.0 && self.output == 0.0
    }
}

// ============================================================================
// Pricing Table
// ============================================================================

/// Per-(vendor, model) pricing with a fallback entry per vendor
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    entries: HashMap<Vendor, HashMap<String, PricingEntry>>,
}

impl PricingTable {
    /// Empty table; every lookup is free
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in rates
    ///
    /// The `_default` entry of each remote vendor mirrors that vendor's
    /// default model, so a model missing from the table is priced like the
    /// model the adapter would pick on its own.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::empty();

        // OpenAI
        let gpt4o_mini = PricingEntry::new(GPT4O_MINI_INPUT_COST, GPT4O_MINI_OUTPUT_COST);
        table.set(Vendor::OpenAi, "gpt-4o", PricingEntry::new(GPT4O_INPUT_COST, GPT4O_OUTPUT_COST));
        table.set(Vendor::OpenAi, "gpt-4o-mini", gpt4o_mini);
        table.set(
            Vendor::OpenAi,
            "gpt-4-turbo",
            PricingEntry::new(GPT4_TURBO_INPUT_COST, GPT4_TURBO_OUTPUT_COST),
        );
        table.set(
            Vendor::OpenAi,
            "gpt-3.5-turbo",
            PricingEntry::new(GPT35_TURBO_INPUT_COST, GPT35_TURBO_OUTPUT_COST),
        );
        table.set(Vendor::OpenAi, DEFAULT_MODEL_KEY, gpt4o_mini);

        // Anthropic Claude
        let sonnet = PricingEntry::new(CLAUDE_SONNET35_INPUT_COST, CLAUDE_SONNET35_OUTPUT_COST);
        table.set(Vendor::Claude, "claude-3-5-sonnet-20241022", sonnet);
        table.set(
            Vendor::Claude,
            "claude-3-5-haiku-20241022",
            PricingEntry::new(CLAUDE_HAIKU35_INPUT_COST, CLAUDE_HAIKU35_OUTPUT_COST),
        );
        table.set(
            Vendor::Claude,
            "claude-3-opus-20240229",
            PricingEntry::new(CLAUDE_OPUS3_INPUT_COST, CLAUDE_OPUS3_OUTPUT_COST),
        );
        table.set(Vendor::Claude, DEFAULT_MODEL_KEY, sonnet);

        // Google Gemini (2.0 flash is free during preview)
        table.set(Vendor::Gemini, "gemini-2.0-flash-exp", PricingEntry::FREE);
        table.set(
            Vendor::Gemini,
            "gemini-1.5-pro",
            PricingEntry::new(GEMINI_PRO15_INPUT_COST, GEMINI_PRO15_OUTPUT_COST),
        );
        table.set(
            Vendor::Gemini,
            "gemini-1.5-flash",
            PricingEntry::new(GEMINI_FLASH15_INPUT_COST, GEMINI_FLASH15_OUTPUT_COST),
        );
        table.set(Vendor::Gemini, DEFAULT_MODEL_KEY, PricingEntry::FREE);

        // Ollama runs locally
        table.set(Vendor::Ollama, DEFAULT_MODEL_KEY, PricingEntry::FREE);

        table
    }

    /// Insert or replace one entry
    pub fn set(&mut self, vendor: Vendor, model: impl Into<String>, entry: PricingEntry) {
        self.entries
            .entry(vendor)
            .or_default()
            .insert(model.into(), PricingEntry::new(entry.input, entry.output));
    }

    /// Builder form of [`PricingTable::set`]
    #[must_use]
    pub fn with_override(mut self, vendor: Vendor, model: impl Into<String>, entry: PricingEntry) -> Self {
        self.set(vendor, model, entry);
        self
    }

    /// Rates for (vendor, model): exact entry, then vendor default, then free
    #[must_use]
    pub fn lookup(&self, model: &str, vendor: &str) -> PricingEntry {
        let Some(models) = Vendor::from_key(vendor).and_then(|v| self.entries.get(&v)) else {
            return PricingEntry::FREE;
        };
        models
            .get(model)
            .or_else(|| models.get(DEFAULT_MODEL_KEY))
            .copied()
            .unwrap_or(PricingEntry::FREE)
    }

    /// Whether the table has an exact entry for (vendor, model)
    #[must_use]
    pub fn contains(&self, vendor: Vendor, model: &str) -> bool {
        self.entries
            .get(&vendor)
            .is_some_and(|models| models.contains_key(model))
    }

    /// Every (vendor, model, entry), sorted, fallback entries included
    #[must_use]
    pub fn entries(&self) -> Vec<(Vendor, &str, PricingEntry)> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .flat_map(|(vendor, models)| {
                models
                    .iter()
                    .map(move |(model, entry)| (*vendor, model.as_str(), *entry))
            })
            .collect();
        all.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        all
    }
}

static BUILTIN: LazyLock<PricingTable> = LazyLock::new(PricingTable::builtin);

/// Shared built-in table
#[must_use]
pub fn builtin_table() -> &'static PricingTable {
    &BUILTIN
}

/// Rates for (vendor, model) from the built-in table. Never negative.
#[must_use]
pub fn get_pricing_info(model: &str, vendor: &str) -> PricingEntry {
    BUILTIN.lookup(model, vendor)
}

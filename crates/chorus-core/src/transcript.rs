//! Transcript - in-memory conversation history
//!
//! One entry per dispatch cycle: the prompt and every vendor's result
//! string. Export only renders; writing to disk is the caller's business.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// One exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// When the exchange was recorded
    pub timestamp: DateTime<Utc>,
    /// Prompt as sent
    pub prompt: String,
    /// Vendor name -> result string (failures sentinel-prefixed)
    pub responses: BTreeMap<String, String>,
}

/// Ordered list of exchanges
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Empty transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an exchange
    pub fn add(&mut self, prompt: impl Into<String>, responses: BTreeMap<String, String>) {
        self.entries.push(TranscriptEntry {
            timestamp: Utc::now(),
            prompt: prompt.into(),
            responses,
        });
    }

    /// Every exchange, oldest first
    #[must_use]
    pub fn history(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of exchanges
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every exchange
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Render as Markdown: one section per exchange, one sub-section per vendor
    #[must_use]
    pub fn export_markdown(&self) -> String {
        let mut md = String::from("# Multi-LLM Conversation\n\n");
        let _ = write!(
            md,
            "**Exported**: {}\n\n---\n\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        );

        for (i, entry) in self.entries.iter().enumerate() {
            let _ = write!(md, "## Exchange {}\n\n", i + 1);
            let _ = write!(md, "**Time**: {}\n\n", entry.timestamp.to_rfc3339());
            let _ = write!(md, "**Prompt**: {}\n\n", entry.prompt);

            for (vendor, response) in &entry.responses {
                let _ = write!(md, "### {vendor}\n\n{response}\n\n");
            }

            md.push_str("---\n\n");
        }

        md
    }

    /// Render as a pretty-printed JSON array
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

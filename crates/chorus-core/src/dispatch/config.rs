//! Dispatch configuration
//!
//! The symbolic vendor map handed to the dispatcher:
//! `{vendor_key: {api_key, model, base_url}}`.

use crate::error::{Error, Result};
use chorus_llm::{Vendor, VendorConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_local_daemon() -> bool {
    true
}

/// Which vendors to attempt and how to reach them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Vendor key -> connection settings. Absent keys are not attempted.
    #[serde(default)]
    pub vendors: BTreeMap<String, VendorConfig>,
    /// Attempt the local daemon even without an entry in `vendors`
    #[serde(default = "default_local_daemon")]
    pub local_daemon: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            vendors: BTreeMap::new(),
            local_daemon: default_local_daemon(),
        }
    }
}

impl DispatchConfig {
    /// Empty configuration that only tries the local daemon
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one vendor entry
    #[must_use]
    pub fn with_vendor(mut self, key: impl Into<String>, settings: VendorConfig) -> Self {
        self.vendors.insert(key.into(), settings);
        self
    }

    /// Enable or disable the implicit local daemon attempt
    #[must_use]
    pub fn with_local_daemon(mut self, enabled: bool) -> Self {
        self.local_daemon = enabled;
        self
    }

    /// Resolve symbolic keys into vendor tags, in vendor order.
    ///
    /// Unknown keys and two keys naming the same vendor (`claude` and
    /// `anthropic`) are configuration errors.
    pub fn resolve(&self) -> Result<Vec<(Vendor, VendorConfig)>> {
        let mut resolved: BTreeMap<Vendor, (String, VendorConfig)> = BTreeMap::new();

        for (key, settings) in &self.vendors {
            let vendor = Vendor::from_key(key).ok_or_else(|| Error::InvalidConfig {
                field: format!("dispatch.vendors.{key}"),
                message: "unknown vendor (expected openai, claude, gemini or ollama)".to_string(),
            })?;

            if let Some((previous, _)) = resolved.get(&vendor) {
                return Err(Error::InvalidConfig {
                    field: format!("dispatch.vendors.{key}"),
                    message: format!("duplicates '{previous}'"),
                });
            }
            resolved.insert(vendor, (key.clone(), settings.clone()));
        }

        if self.local_daemon {
            resolved
                .entry(Vendor::Ollama)
                .or_insert_with(|| (Vendor::Ollama.key().to_string(), VendorConfig::default()));
        }

        Ok(resolved
            .into_iter()
            .map(|(vendor, (_, settings))| (vendor, settings))
            .collect())
    }
}

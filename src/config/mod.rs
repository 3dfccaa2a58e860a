//! Application configuration
//!
//! `AppConfig` mirrors config/default.toml. After loading, credentials
//! missing from the file layers are taken from the conventional vendor
//! environment variables.

mod loader;

pub use loader::load_config;

use anyhow::{bail, Result};
use chorus_core::DispatchConfig;
use chorus_llm::providers::OllamaConfig;
use chorus_llm::{PricingEntry, PricingTable, Vendor, VendorConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Vendors to dispatch to
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Pricing overrides
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// `[pricing.overrides.<vendor>."<model>"]` tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub overrides: BTreeMap<String, BTreeMap<String, PricingEntry>>,
}

impl AppConfig {
    /// Built-in pricing with configured overrides applied
    pub fn pricing_table(&self) -> Result<PricingTable> {
        let mut table = PricingTable::builtin();
        for (vendor_key, models) in &self.pricing.overrides {
            let Some(vendor) = Vendor::from_key(vendor_key) else {
                bail!("invalid configuration: pricing.overrides.{vendor_key}: unknown vendor");
            };
            for (model, entry) in models {
                table.set(vendor, model.clone(), *entry);
            }
        }
        Ok(table)
    }

    /// Fill credentials and the local daemon endpoint from the process environment
    pub fn fill_from_env(&mut self) {
        self.fill_from(|name| std::env::var(name).ok());
    }

    fn fill_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        for (key, settings) in self.dispatch.vendors.iter_mut() {
            let Some(vendor) = Vendor::from_key(key) else {
                // reported by DispatchConfig::resolve
                continue;
            };
            if settings.has_key() {
                continue;
            }
            settings.api_key = match vendor {
                Vendor::OpenAi => lookup("OPENAI_API_KEY"),
                Vendor::Claude => lookup("ANTHROPIC_API_KEY"),
                Vendor::Gemini => lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")),
                Vendor::Ollama => None,
            };
        }

        let has_local_entry = self
            .dispatch
            .vendors
            .keys()
            .any(|k| Vendor::from_key(k) == Some(Vendor::Ollama));
        if self.dispatch.local_daemon && !has_local_entry {
            self.dispatch
                .vendors
                .insert(Vendor::Ollama.key().to_string(), VendorConfig::default());
        }

        if let Some(settings) = self
            .dispatch
            .vendors
            .iter_mut()
            .find_map(|(k, s)| (Vendor::from_key(k) == Some(Vendor::Ollama)).then_some(s))
        {
            if settings.base_url.is_none() {
                settings.base_url = lookup("OLLAMA_BASE_URL").or_else(|| lookup("OLLAMA_HOST"));
            }
            if settings.model.is_none() {
                settings.model = lookup("OLLAMA_MODEL");
            }
        }
    }

    /// Daemon URL that will be used for the local vendor
    #[must_use]
    pub fn local_daemon_url(&self) -> String {
        self.dispatch
            .vendors
            .iter()
            .find(|(k, _)| Vendor::from_key(k) == Some(Vendor::Ollama))
            .and_then(|(_, s)| s.base_url.clone())
            .map_or_else(
                || OllamaConfig::default().base_url,
                |url| OllamaConfig::new().with_base_url(url).base_url,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn default_config() -> AppConfig {
        toml_config(loader::DEFAULT_CONFIG)
    }

    fn toml_config(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config_lists_every_vendor() {
        let config = default_config();
        let resolved = config.dispatch.resolve().unwrap();

        assert_eq!(resolved.len(), 4);
        assert_eq!(config.dispatch.vendors["openai"].model.as_deref(), Some("gpt-4o-mini"));
        assert!(config.dispatch.vendors.values().all(|v| v.api_key.is_none()));
        assert!(config.pricing.overrides.is_empty());
    }

    #[test]
    fn test_credentials_filled_from_env() {
        let mut config = default_config();
        config.fill_from(env(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("GOOGLE_API_KEY", "AIza-env"),
            ("ANTHROPIC_API_KEY", "  "),
            ("OLLAMA_HOST", "gpu-box:11434"),
        ]));

        let vendors = &config.dispatch.vendors;
        assert_eq!(vendors["openai"].api_key.as_deref(), Some("sk-env"));
        assert_eq!(vendors["gemini"].api_key.as_deref(), Some("AIza-env"));
        assert!(vendors["claude"].api_key.is_none());
        assert_eq!(vendors["ollama"].base_url.as_deref(), Some("gpu-box:11434"));
        assert_eq!(config.local_daemon_url(), "http://gpu-box:11434");
    }

    #[test]
    fn test_file_credentials_win_over_env() {
        let mut config = toml_config(
            r#"
            [dispatch.vendors.openai]
            api_key = "sk-file"
            "#,
        );
        config.fill_from(env(&[("OPENAI_API_KEY", "sk-env")]));

        assert_eq!(config.dispatch.vendors["openai"].api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn test_removed_vendor_stays_removed() {
        let mut config = toml_config(
            r#"
            [dispatch]
            local_daemon = false
            [dispatch.vendors.claude]
            model = "claude-3-5-haiku-20241022"
            "#,
        );
        config.fill_from(env(&[("OPENAI_API_KEY", "sk-env")]));

        assert_eq!(config.dispatch.vendors.len(), 1);
        assert!(!config.dispatch.vendors.contains_key("openai"));
        assert!(!config.dispatch.vendors.contains_key("ollama"));
    }

    #[test]
    fn test_pricing_overrides() {
        let config = toml_config(
            r#"
            [pricing.overrides.ollama."llama3.2"]
            input = 0.5
            output = 1.5
            "#,
        );
        let table = config.pricing_table().unwrap();

        assert_eq!(table.lookup("llama3.2", "ollama"), PricingEntry::new(0.5, 1.5));
        assert_eq!(table.lookup("gpt-4o", "openai"), PricingEntry::new(2.50, 10.00));
    }

    #[test]
    fn test_pricing_override_unknown_vendor() {
        let config = toml_config(
            r#"
            [pricing.overrides.acme."acme-1"]
            input = 1.0
            output = 1.0
            "#,
        );
        assert!(config.pricing_table().is_err());
    }
}

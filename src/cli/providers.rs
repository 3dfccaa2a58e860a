//! `chorus providers` - configuration and reachability per vendor

use crate::config::AppConfig;
use anyhow::Result;
use chorus_llm::{build_adapter, util::mask_api_key, Vendor};
use futures::future::join_all;

pub async fn run(config: &AppConfig) -> Result<()> {
    let resolved = config
        .dispatch
        .resolve()
        .map_err(|e| anyhow::anyhow!(chorus_core::format_error_for_cli(&e)))?;

    if resolved.is_empty() {
        println!("⚠️  No vendors configured.");
        return Ok(());
    }

    let adapters = resolved
        .iter()
        .map(|(vendor, settings)| build_adapter(*vendor, settings))
        .collect::<chorus_llm::Result<Vec<_>>>()?;
    let checks = join_all(adapters.iter().map(|a| a.is_configured())).await;

    println!("🔌 Providers\n");
    let mut ready = 0;
    for ((vendor, settings), (adapter, ok)) in resolved.iter().zip(adapters.iter().zip(checks)) {
        let detail = match vendor {
            Vendor::Ollama => config.local_daemon_url(),
            _ => settings
                .api_key
                .as_deref()
                .filter(|k| !k.trim().is_empty())
                .map_or_else(
                    || format!("no key ({})", vendor.api_key_env().unwrap_or("-")),
                    mask_api_key,
                ),
        };
        let state = match (ok, vendor.is_local()) {
            (true, _) => "✅ ready",
            (false, true) => "❌ not running",
            (false, false) => "⚠️  not configured",
        };
        if ok {
            ready += 1;
        }
        println!(
            "  {:<8} {:<30} {:<28} {}",
            vendor.display_name(),
            adapter.model(),
            detail,
            state
        );
    }

    println!();
    if ready == 0 {
        println!("⚠️  Nothing is ready. Set an API key or start Ollama with `ollama serve`.");
    } else {
        println!("✅ {ready} provider(s) ready.");
    }
    Ok(())
}

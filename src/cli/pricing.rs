//! `chorus pricing` - inspect the rates used for estimates

use super::render::usd;
use crate::config::AppConfig;
use anyhow::Result;
use chorus_llm::{cost::DEFAULT_MODEL_KEY, Vendor};

pub fn run(config: &AppConfig, vendor: Option<&str>, model: Option<&str>) -> Result<()> {
    let table = config.pricing_table()?;

    let Some(vendor) = vendor else {
        println!("💲 Pricing (USD per 1M tokens, input / output)\n");
        for (vendor, model, entry) in table.entries() {
            let model = if model == DEFAULT_MODEL_KEY { "(any other model)" } else { model };
            println!(
                "  {:<10} {:<30} {:>8} / {:<8}",
                vendor.key(),
                model,
                usd(entry.input),
                usd(entry.output)
            );
        }
        return Ok(());
    };

    let model = model.unwrap_or(DEFAULT_MODEL_KEY);
    let entry = table.lookup(model, vendor);

    match Vendor::from_key(vendor) {
        None => println!("⚠️  Unknown vendor '{vendor}', priced at $0"),
        Some(known) if !table.contains(known, model) => {
            println!("ℹ️  No exact entry for {}/{model}, using the vendor default", known.key());
        }
        Some(_) => {}
    }

    println!(
        "💲 {vendor}/{model}: input {} / 1M tokens, output {} / 1M tokens",
        usd(entry.input),
        usd(entry.output)
    );
    Ok(())
}

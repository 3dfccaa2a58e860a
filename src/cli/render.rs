//! Terminal rendering shared by `ask` and `chat`

use chorus_core::{DispatchReport, Session};

/// Format a USD amount with enough precision for sub-cent costs
pub(crate) fn usd(amount: f64) -> String {
    if amount == 0.0 {
        "$0".to_string()
    } else if amount < 0.01 {
        format!("${amount:.6}")
    } else {
        format!("${amount:.4}")
    }
}

/// Every vendor's answer, failures included
pub(crate) fn print_report(report: &DispatchReport) {
    for result in &report.results {
        let status = if result.is_success() { "✅" } else { "❌" };
        println!(
            "\n{} {} ({}) · {}ms · {}",
            status,
            result.vendor_name(),
            result.model,
            result.latency_ms,
            usd(result.cost)
        );
        println!("{}", "─".repeat(60));
        match result.outcome.text() {
            Some(text) => println!("{text}"),
            None => println!("{}", result.outcome),
        }
    }
}

/// Cycle cost, running total and the savings line
pub(crate) fn print_costs(report: &DispatchReport, session: &Session) {
    println!();
    println!(
        "💰 This prompt: {} · Session total: {}",
        usd(report.cycle_cost()),
        usd(session.total_cost())
    );

    let savings = session.savings();
    if let Some(name) = savings.most_expensive {
        if savings.amount > 0.0 {
            println!("📉 Saved {} versus sending everything to {}", usd(savings.amount), name);
        }
    }
}

/// Per-(vendor, model) breakdown
pub(crate) fn print_breakdown(session: &Session) {
    let summary = session.summary();
    if summary.by_vendor.is_empty() {
        println!("📊 No usage yet.");
        return;
    }

    println!("📊 Usage by model");
    println!(
        "  {:<40} {:>8} {:>10} {:>10} {:>12}",
        "vendor/model", "requests", "input", "output", "cost"
    );
    for (vendor, model, bucket) in summary.buckets() {
        println!(
            "  {:<40} {:>8} {:>10} {:>10} {:>12}",
            format!("{vendor}/{model}"),
            bucket.requests,
            bucket.input_tokens,
            bucket.output_tokens,
            usd(bucket.cost)
        );
    }
    println!("  Total: {}", usd(summary.total_cost));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_precision() {
        assert_eq!(usd(0.0), "$0");
        assert_eq!(usd(0.000045), "$0.000045");
        assert_eq!(usd(1.5), "$1.5000");
    }
}

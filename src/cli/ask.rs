//! `chorus ask` - one dispatch cycle

use super::render;
use crate::config::AppConfig;
use anyhow::Result;
use chorus_core::{format_error_for_cli, DispatchReport, Session};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct AskOutput<'a> {
    responses: BTreeMap<String, String>,
    report: &'a DispatchReport,
    summary: chorus_llm::UsageSummary,
    savings: chorus_llm::Savings,
}

pub async fn run(config: &AppConfig, prompt: &str, json: bool) -> Result<()> {
    let dispatcher = super::new_dispatcher(config)?;
    let mut session = super::new_session(config)?;

    let report = session
        .ask(&dispatcher, prompt)
        .await
        .map_err(|e| anyhow::anyhow!(format_error_for_cli(&e)))?;

    if json {
        print_json(&report, &session)?;
    } else {
        render::print_report(&report);
        render::print_costs(&report, &session);
        println!();
        render::print_breakdown(&session);
    }

    Ok(())
}

fn print_json(report: &DispatchReport, session: &Session) -> Result<()> {
    let output = AskOutput {
        responses: report.to_wire_map(),
        report,
        summary: session.summary(),
        savings: session.savings(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

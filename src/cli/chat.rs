//! `chorus chat` - interactive session
//!
//! One `Session` lives for the whole loop, so the ledger, transcript and
//! savings line accumulate across prompts.

use super::render;
use crate::config::AppConfig;
use anyhow::Result;
use chorus_core::{format_error_for_cli, Error as CoreError, Session};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// A line typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Prompt(&'a str),
    Cost,
    History,
    Export(ExportFormat),
    Clear,
    Reset,
    Help,
    Quit,
    Unknown(&'a str),
    Empty,
}

#[derive(Debug, PartialEq, Eq)]
enum ExportFormat {
    Markdown,
    Json,
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if !line.starts_with('/') {
        return Input::Prompt(line);
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    match (command, parts.next()) {
        ("/cost", None) => Input::Cost,
        ("/history", None) => Input::History,
        ("/export", None | Some("md" | "markdown")) => Input::Export(ExportFormat::Markdown),
        ("/export", Some("json")) => Input::Export(ExportFormat::Json),
        ("/clear", None) => Input::Clear,
        ("/reset", None) => Input::Reset,
        ("/help", None) => Input::Help,
        ("/quit" | "/exit", None) => Input::Quit,
        _ => Input::Unknown(line),
    }
}

const HELP: &str = "\
Commands:
  /cost           usage breakdown and savings
  /history        prompts so far
  /export md|json print the transcript
  /clear          forget the transcript (costs are kept)
  /reset          start a new session
  /quit           leave";

pub async fn run(config: &AppConfig) -> Result<()> {
    let mut session = super::new_session(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("🎵 Chorus chat · /help for commands");

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Prompt(prompt) => ask(config, &mut session, prompt).await?,
            Input::Cost => {
                render::print_breakdown(&session);
                let savings = session.savings();
                if let Some(name) = savings.most_expensive {
                    println!("📉 Savings versus {}: {}", name, render::usd(savings.amount));
                }
            }
            Input::History => {
                let history = session.transcript().history();
                if history.is_empty() {
                    println!("📜 No exchanges yet.");
                }
                for (i, entry) in history.iter().enumerate() {
                    println!(
                        "{:>3}. [{}] {} ({} responses)",
                        i + 1,
                        entry.timestamp.format("%H:%M:%S"),
                        entry.prompt,
                        entry.responses.len()
                    );
                }
            }
            Input::Export(ExportFormat::Markdown) => {
                println!("{}", session.transcript().export_markdown());
            }
            Input::Export(ExportFormat::Json) => {
                println!("{}", session.transcript().export_json()?);
            }
            Input::Clear => {
                session.transcript_mut().clear();
                println!("🧹 Transcript cleared.");
            }
            Input::Reset => {
                session.reset();
                println!("🔄 Session reset.");
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Unknown(line) => println!("❓ Unknown command: {line}\n{HELP}"),
        }
    }

    let stats = session.session_stats();
    println!(
        "\n👋 {} prompt(s), {} total, {} minute(s).",
        stats.total_interactions,
        render::usd(stats.total_cost),
        stats.duration_minutes
    );
    Ok(())
}

async fn ask(config: &AppConfig, session: &mut Session, prompt: &str) -> Result<()> {
    let dispatcher = super::new_dispatcher(config)?;

    match session.ask(&dispatcher, prompt).await {
        Ok(report) => {
            render::print_report(&report);
            render::print_costs(&report, session);
        }
        // Keep the loop alive; the user may start a daemon or set a key.
        Err(CoreError::NoProviders) => {
            warn!("No providers available");
            println!("{}", format_error_for_cli(&CoreError::NoProviders));
        }
        Err(e) => return Err(anyhow::anyhow!(format_error_for_cli(&e))),
    }
    Ok(())
}

//! CLI module for Chorus
//!
//! Provides commands:
//! - `ask`: One dispatch cycle, answers side by side
//! - `chat`: Interactive session that keeps one usage ledger
//! - `providers`: Which vendors are configured and reachable
//! - `pricing`: Rates used for cost estimates

use crate::config::{load_config, AppConfig};
use anyhow::Result;
use chorus_core::{format_error_for_cli, Dispatcher, Session};
use clap::{Parser, Subcommand};

pub mod ask;
pub mod chat;
pub mod pricing;
pub mod providers;
mod render;

/// Chorus CLI
#[derive(Parser, Debug)]
#[command(name = "chorus")]
#[command(about = "Ask several LLM vendors at once and compare answers and cost")]
#[command(version)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one prompt to every configured vendor
    Ask {
        /// Prompt text
        prompt: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session
    Chat,
    /// Show configured vendors and whether they are reachable
    Providers,
    /// Show pricing for a vendor/model, or the whole table
    Pricing {
        /// Vendor key (openai, claude, gemini, ollama)
        vendor: Option<String>,
        /// Model identifier
        model: Option<String>,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Ask { prompt, json }) => ask::run(&load_config()?, &prompt, json).await,
        Some(Commands::Chat) => chat::run(&load_config()?).await,
        Some(Commands::Providers) => providers::run(&load_config()?).await,
        Some(Commands::Pricing { vendor, model }) => {
            pricing::run(&load_config()?, vendor.as_deref(), model.as_deref())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Fresh session priced with the configured table
pub(crate) fn new_session(config: &AppConfig) -> Result<Session> {
    Ok(Session::with_pricing(config.pricing_table()?))
}

/// Fresh dispatcher; adapters are rebuilt for every cycle
pub(crate) fn new_dispatcher(config: &AppConfig) -> Result<Dispatcher> {
    let dispatcher = Dispatcher::from_config(&config.dispatch)
        .map_err(|e| anyhow::anyhow!(format_error_for_cli(&e)))?;
    Ok(dispatcher.with_pricing(config.pricing_table()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from(["chorus", "ask", "hello there", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Ask { prompt, json }) => {
                assert_eq!(prompt, "hello there");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_pricing() {
        let cli = Cli::try_parse_from(["chorus", "pricing", "openai", "gpt-4o"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Pricing { vendor: Some(ref v), model: Some(ref m) }) if v == "openai" && m == "gpt-4o"
        ));

        let cli = Cli::try_parse_from(["chorus", "--json-logs", "pricing"]).unwrap();
        assert!(cli.json_logs);
    }

    #[test]
    fn test_cli_verify() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}

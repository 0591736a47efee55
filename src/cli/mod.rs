//! Command-line interface for secondbrain.
//!
//! Provides commands for running the bot, capturing a note straight from
//! the terminal, resetting the Telegram webhook, and inspecting the
//! resolved configuration.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::adapters::{OpenAiClient, TelegramClient};
use crate::config::Config;
use crate::core::{Analyzer, Orchestrator};
use crate::domain::{CaptureInput, CaptureSource};
use crate::sinks::{NotionSink, Sink, VaultSink};
use crate::transport::Bot;

/// secondbrain - Telegram capture bot with multi-sink fan-out
#[derive(Parser, Debug)]
#[command(name = "secondbrain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Telegram bot (long polling)
    Run,

    /// Capture a note without going through Telegram
    Capture {
        /// Text to capture (reads from stdin if not provided)
        text: Option<String>,

        /// Read the note from a file instead
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Remove any configured webhook so polling can start
    ResetWebhook,

    /// Show resolved configuration (secrets redacted)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run => run_bot().await,
            Commands::Capture { text, input } => run_capture(text, input).await,
            Commands::ResetWebhook => reset_webhook().await,
            Commands::Config => show_config(),
        }
    }
}

/// Build the orchestrator over the sinks the configuration activates
fn build_orchestrator(config: &Config) -> Orchestrator {
    let analyzer = Analyzer::new(Box::new(OpenAiClient::new(config.openai_api_key.clone())));

    let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
    if let Some(notion) = &config.notion {
        sinks.push(Box::new(NotionSink::new(notion)));
    }
    if let Some(vault) = &config.vault {
        sinks.push(Box::new(VaultSink::new(vault)));
    }

    Orchestrator::new(analyzer, sinks)
}

/// Start the polling bot
async fn run_bot() -> Result<()> {
    let config = Config::from_env()?;

    let telegram = TelegramClient::new(config.telegram_token.clone());
    let transcriber = Box::new(OpenAiClient::new(config.openai_api_key.clone()));
    let orchestrator = build_orchestrator(&config);

    let bot = Bot::new(telegram, transcriber, orchestrator, config.telegram_chat_id);
    bot.run().await
}

/// One-off capture from the terminal
async fn run_capture(text: Option<String>, input: Option<PathBuf>) -> Result<()> {
    let config = Config::from_env()?;
    let content = read_content(text, input)?;
    if content.is_empty() {
        anyhow::bail!("Nothing to capture");
    }

    let orchestrator = build_orchestrator(&config);
    let capture = CaptureInput::new(content, Utc::now(), CaptureSource::Text);
    let references = orchestrator.capture(capture).await?;

    if references.is_empty() {
        println!("Captured (no sinks configured)");
    } else {
        println!("Captured:");
        for (sink, url) in &references {
            println!("  {}: {}", sink, url);
        }
    }

    Ok(())
}

/// Resolve the capture text from argument, file, or stdin
fn read_content(text: Option<String>, input: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = input {
        return std::fs::read_to_string(&path)
            .map(|content| content.trim().to_string())
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer.trim().to_string())
}

/// Delete the Telegram webhook
async fn reset_webhook() -> Result<()> {
    let config = Config::from_env()?;
    let telegram = TelegramClient::new(config.telegram_token.clone());

    telegram.delete_webhook().await?;
    println!("Webhook removed; polling can start.");

    Ok(())
}

/// Print the resolved configuration with secrets redacted
fn show_config() -> Result<()> {
    let config = Config::from_env()?;

    println!("Configuration:");
    println!(
        "  Chat restriction: {}",
        config
            .telegram_chat_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    match &config.notion {
        Some(notion) => println!("  Notion sink:      active (database {})", notion.database_id),
        None => println!("  Notion sink:      not configured"),
    }
    match &config.vault {
        Some(vault) => println!(
            "  Vault sink:       active ({} @ {})",
            vault.repo, vault.branch
        ),
        None => println!("  Vault sink:       not configured"),
    }

    Ok(())
}

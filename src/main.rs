//! Main entry point for AI Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ai_translator::cli::commands::{self, Commands};
use ai_translator::TranslatorConfig;

/// AI Translator - detect, translate and collect vocabulary
#[derive(Parser, Debug)]
#[command(name = "ai-translator", version, about, long_about = None)]
struct Args {
    /// API key (optional, defaults to OPENAI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    let default_filter = format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = TranslatorConfig::load(args.config.as_deref())?;

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        config.api_key = Some(api_key);
    }

    config.validate()?;

    match args.command {
        Some(Commands::Translate { text, target_lang }) => {
            // the rejection notice has already been printed
            if !commands::handle_translate(config, text, target_lang).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Interactive {
            target_lang,
            export_dir,
        }) => {
            commands::handle_interactive(config, target_lang, export_dir).await?;
        }
        None => {
            commands::handle_interactive(config, None, None).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

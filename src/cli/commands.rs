//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use tracing::info;

use crate::cli::render;
use crate::cli::repl::{spinner, ReplSession};
use crate::core::client::LanguageService;
use crate::core::config::TranslatorConfig;
use crate::core::controller::{InteractionController, Outcome, SubmitRequest};

/// Commands for AI Translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a single text and exit
    Translate {
        /// Text to translate
        text: String,

        /// Target language (default from configuration)
        #[arg(short, long)]
        target_lang: Option<String>,
    },

    /// Start an interactive translation session
    Interactive {
        /// Target language (default from configuration)
        #[arg(short, long)]
        target_lang: Option<String>,

        /// Directory for vocabulary exports
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
}

/// Handle one-shot translation command
///
/// Returns `false` when the request was rejected; its notices are
/// printed here, so the caller only needs to set the exit status.
pub async fn handle_translate(
    config: TranslatorConfig,
    text: String,
    target_lang: Option<String>,
) -> anyhow::Result<bool> {
    let target_lang = target_lang.unwrap_or_else(|| config.default_target_language.clone());
    let api_key = config.api_key.clone();

    info!("Translating to {}", target_lang);

    let service = LanguageService::from_config(config)?;
    let mut controller = InteractionController::new(service);

    let pb = spinner();
    let outcome = controller
        .submit(SubmitRequest::new(text, target_lang, api_key))
        .await;
    pb.finish_and_clear();

    print!("{}", render::render_outcome(&outcome));

    Ok(matches!(outcome, Outcome::Displayed(_)))
}

/// Handle interactive session command
pub async fn handle_interactive(
    config: TranslatorConfig,
    target_lang: Option<String>,
    export_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let target_lang = target_lang.unwrap_or_else(|| config.default_target_language.clone());
    let export_dir = export_dir.unwrap_or_else(|| config.export_dir.clone());
    let api_key = config.api_key.clone();

    info!("Starting interactive session");
    info!("Target language: {}", target_lang);
    info!("Export directory: {}", export_dir.display());

    let service = LanguageService::from_config(config)?;
    let controller = InteractionController::new(service);

    let mut session = ReplSession::new(controller, target_lang, api_key, export_dir);
    session.run().await?;

    let stats = session.controller().stats();
    println!(
        "\n✅ Session finished: {} translations, total cost ${:.4}",
        stats.translations, stats.total_cost
    );

    Ok(())
}

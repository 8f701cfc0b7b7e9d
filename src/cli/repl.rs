//! Interactive translation session with slash commands

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::render;
use crate::core::controller::{InteractionController, SubmitRequest};
use crate::core::models::VocabularyId;

pub const HELP: &str = "\
Type text and press Enter to translate it.
Start a line with // to translate text beginning with a slash.
Commands:
  /save          save the last translation to your vocabulary
  /vocab         list saved vocabulary
  /remove <id>   delete a vocabulary entry
  /export        write the vocabulary to a CSV file
  /history       show recent translations
  /stats         show token usage and cost
  /to <lang>     change the target language
  /key <secret>  set the API key for this session
  /help          show this help
  /quit          leave
";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Translate(String),
    Save,
    ShowVocabulary,
    Remove(VocabularyId),
    Export,
    History,
    Stats,
    SetTarget(String),
    SetKey(String),
    Help,
    Quit,
    /// Malformed or unknown command, with a message for the user
    Invalid(String),
}

impl ReplCommand {
    /// Parse a line; anything not starting with `/` is text to translate
    ///
    /// A leading `//` stands for a literal slash, so `//usr` translates `/usr`.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplCommand::Empty;
        }

        if let Some(text) = line.trim_start().strip_prefix("//") {
            return ReplCommand::Translate(format!("/{}", text.trim_end_matches(['\r', '\n'])));
        }

        let Some(command) = trimmed.strip_prefix('/') else {
            return ReplCommand::Translate(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match (name, arg) {
            ("save", _) => ReplCommand::Save,
            ("vocab", _) => ReplCommand::ShowVocabulary,
            ("remove", arg) => match arg.parse::<u64>() {
                Ok(id) => ReplCommand::Remove(VocabularyId(id)),
                Err(_) => ReplCommand::Invalid("Usage: /remove <id>".to_string()),
            },
            ("export", _) => ReplCommand::Export,
            ("history", _) => ReplCommand::History,
            ("stats", _) => ReplCommand::Stats,
            ("to", "") => ReplCommand::Invalid("Usage: /to <language>".to_string()),
            ("to", lang) => ReplCommand::SetTarget(lang.to_string()),
            ("key", "") => ReplCommand::Invalid("Usage: /key <secret>".to_string()),
            ("key", key) => ReplCommand::SetKey(key.to_string()),
            ("help", _) => ReplCommand::Help,
            ("quit", _) | ("exit", _) => ReplCommand::Quit,
            (other, _) => ReplCommand::Invalid(format!("Unknown command: /{}", other)),
        }
    }
}

/// Whether the loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// REPL state around one controller
#[derive(Debug)]
pub struct ReplSession {
    controller: InteractionController,
    target_language: String,
    api_key: Option<String>,
    export_dir: PathBuf,
}

impl ReplSession {
    pub fn new(
        controller: InteractionController,
        target_language: String,
        api_key: Option<String>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            controller,
            target_language,
            api_key,
            export_dir,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Run one command and return what to print
    pub async fn handle(&mut self, command: ReplCommand) -> (Flow, String) {
        let output = match command {
            ReplCommand::Empty => String::new(),
            ReplCommand::Translate(text) => {
                let request =
                    SubmitRequest::new(text, self.target_language.clone(), self.api_key.clone());
                let spinner = spinner();
                let outcome = self.controller.submit(request).await;
                spinner.finish_and_clear();
                let mut out = render::render_outcome(&outcome);
                if outcome.is_displayed() {
                    out.push_str("Type /save to add it to your vocabulary.\n");
                }
                out
            }
            ReplCommand::Save => match self.controller.save_to_vocabulary() {
                Ok(id) => format!("✅ Added to vocabulary! (id {})\n", id),
                Err(e) => format!("❌ {}\n", e),
            },
            ReplCommand::ShowVocabulary => render::render_vocabulary(self.controller.vocabulary()),
            ReplCommand::Remove(id) => match self.controller.remove_vocabulary(id) {
                Ok(entry) => format!("🗑️  Removed \"{}\"\n", entry.source_text),
                Err(e) => format!("❌ {}\n", e),
            },
            ReplCommand::Export => {
                if self.controller.vocabulary().is_empty() {
                    "Nothing to export yet.\n".to_string()
                } else {
                    match self.controller.export_vocabulary(&self.export_dir) {
                        Ok(path) => format!("📥 Vocabulary exported to {}\n", path.display()),
                        Err(e) => format!("❌ Export failed: {}\n", e),
                    }
                }
            }
            ReplCommand::History => render::render_history(&self.controller.recent_translations()),
            ReplCommand::Stats => render::render_stats(&self.controller.stats()),
            ReplCommand::SetTarget(lang) => {
                self.target_language = lang;
                format!("Target language: {}\n", self.target_language)
            }
            ReplCommand::SetKey(key) => {
                self.api_key = Some(key);
                "API key set for this session.\n".to_string()
            }
            ReplCommand::Help => HELP.to_string(),
            ReplCommand::Quit => return (Flow::Quit, "Bye!\n".to_string()),
            ReplCommand::Invalid(message) => format!("❌ {}\n", message),
        };
        (Flow::Continue, output)
    }

    /// Read stdin line by line until EOF or `/quit`
    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("🌐 AI Translator - target language: {}", self.target_language);
        println!("Type /help for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let command = ReplCommand::parse(&line);
            debug!("REPL command: {:?}", command_name(&command));

            let (flow, output) = self.handle(command).await;
            print!("{}", output);
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }
}

/// Command name without its payload, so secrets stay out of logs
fn command_name(command: &ReplCommand) -> &'static str {
    match command {
        ReplCommand::Empty => "empty",
        ReplCommand::Translate(_) => "translate",
        ReplCommand::Save => "save",
        ReplCommand::ShowVocabulary => "vocab",
        ReplCommand::Remove(_) => "remove",
        ReplCommand::Export => "export",
        ReplCommand::History => "history",
        ReplCommand::Stats => "stats",
        ReplCommand::SetTarget(_) => "to",
        ReplCommand::SetKey(_) => "key",
        ReplCommand::Help => "help",
        ReplCommand::Quit => "quit",
        ReplCommand::Invalid(_) => "invalid",
    }
}

/// Spinner shown while remote calls run
pub fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Translating...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::ScriptedBackend;
    use crate::core::client::LanguageService;
    use crate::core::config::TranslatorConfig;
    use crate::core::models::{ChatResponse, TokenUsage};
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(
            ReplCommand::parse("Hello world"),
            ReplCommand::Translate("Hello world".to_string())
        );
        assert_eq!(ReplCommand::parse("/save"), ReplCommand::Save);
        assert_eq!(ReplCommand::parse("/remove 4"), ReplCommand::Remove(VocabularyId(4)));
        assert!(matches!(ReplCommand::parse("/remove x"), ReplCommand::Invalid(_)));
        assert_eq!(
            ReplCommand::parse("/to  Brazilian Portuguese "),
            ReplCommand::SetTarget("Brazilian Portuguese".to_string())
        );
        assert!(matches!(ReplCommand::parse("/to"), ReplCommand::Invalid(_)));
        assert_eq!(ReplCommand::parse("/key sk-x"), ReplCommand::SetKey("sk-x".to_string()));
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
        assert_eq!(
            ReplCommand::parse("//usr is a path"),
            ReplCommand::Translate("/usr is a path".to_string())
        );
        assert_eq!(ReplCommand::parse("  //save"), ReplCommand::Translate("/save".to_string()));
        assert_eq!(
            ReplCommand::parse("/frobnicate"),
            ReplCommand::Invalid("Unknown command: /frobnicate".to_string())
        );
    }

    fn session(replies: Vec<crate::core::errors::Result<ChatResponse>>, dir: PathBuf) -> ReplSession {
        let backend = Arc::new(ScriptedBackend::new(replies));
        let service = LanguageService::new(backend, TranslatorConfig::default());
        ReplSession::new(
            InteractionController::new(service),
            "French".to_string(),
            None,
            dir,
        )
    }

    #[tokio::test]
    async fn test_translate_save_export_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut repl = session(
            vec![
                Ok(ChatResponse::with_content("English", None)),
                Ok(ChatResponse::with_content(
                    "Bonjour",
                    Some(TokenUsage {
                        input_tokens: 3,
                        output_tokens: 2,
                    }),
                )),
            ],
            dir.path().to_path_buf(),
        );

        // no key yet
        let (_, out) = repl.handle(ReplCommand::parse("Hello")).await;
        assert!(out.contains("API key"));

        let (_, out) = repl.handle(ReplCommand::parse("/export")).await;
        assert_eq!(out, "Nothing to export yet.\n");

        repl.handle(ReplCommand::parse("/key sk-x")).await;
        let (flow, out) = repl.handle(ReplCommand::parse("Hello")).await;
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("Bonjour"));
        assert!(out.contains("Translation #1"));

        let (_, out) = repl.handle(ReplCommand::Save).await;
        assert!(out.contains("id 1"));

        let (_, out) = repl.handle(ReplCommand::Export).await;
        assert!(out.contains("vocabulary_"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        let (_, out) = repl.handle(ReplCommand::parse("/remove 1")).await;
        assert!(out.contains("Removed \"Hello\""));
        let (_, out) = repl.handle(ReplCommand::parse("/remove 1")).await;
        assert!(out.contains("not found"));

        let (flow, _) = repl.handle(ReplCommand::Quit).await;
        assert_eq!(flow, Flow::Quit);
    }

    #[tokio::test]
    async fn test_set_target_language() {
        let mut repl = session(Vec::new(), PathBuf::from("."));
        repl.handle(ReplCommand::parse("/to German")).await;
        assert_eq!(repl.target_language(), "German");
        assert_eq!(repl.controller().session().translation_count(), 0);
    }
}

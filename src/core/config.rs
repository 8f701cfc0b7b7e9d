//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::cost::Pricing;
use crate::core::errors::{Result, TranslationError};

/// Prefix of the environment variables layered over the file
pub const ENV_PREFIX: &str = "TRANSLATOR";

/// Default OpenAI-compatible chat endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model tier; the default prices below belong to it
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for translator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Credential; may also be supplied per request
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub model: String,
    /// USD per 1000 input tokens
    pub input_cost_per_1k: f64,
    /// USD per 1000 output tokens
    pub output_cost_per_1k: f64,
    pub detect_max_tokens: u32,
    pub translate_max_tokens: u32,
    pub timeout_ms: u64,
    pub default_target_language: String,
    /// Spend shown as a full usage bar
    pub budget_usd: f64,
    /// Number of recent translations listed
    pub history_limit: usize,
    pub export_dir: PathBuf,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            input_cost_per_1k: 0.00015,
            output_cost_per_1k: 0.0006,
            detect_max_tokens: 50,
            translate_max_tokens: 1000,
            timeout_ms: 30000,
            default_target_language: "English".to_string(),
            budget_usd: 1.0,
            history_limit: 5,
            export_dir: PathBuf::from("."),
        }
    }
}

impl TranslatorConfig {
    /// Load defaults, then an optional file, then `TRANSLATOR_*` variables
    ///
    /// `OPENAI_API_KEY` fills in the credential when no source set one.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> anyhow::Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(::config::File::from(path));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(env_prefix).try_parsing(true),
        );

        let mut loaded: Self = builder.build()?.try_deserialize()?;

        if loaded.api_key.is_none() {
            loaded.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        debug!(model = %loaded.model, endpoint = %loaded.api_endpoint, "Configuration loaded");
        Ok(loaded)
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file, without the credential
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// The credential is not required here; requests without one are
    /// rejected individually.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(TranslationError::ConfigError {
                message: message.to_string(),
            })
        };

        if self.api_endpoint.is_empty() {
            return invalid("API endpoint is required");
        }

        if self.model.is_empty() {
            return invalid("Model is required");
        }

        if self.timeout_ms == 0 {
            return invalid("timeout_ms must be greater than 0");
        }

        if self.input_cost_per_1k < 0.0 || self.output_cost_per_1k < 0.0 {
            return invalid("token prices must not be negative");
        }

        if self.budget_usd <= 0.0 {
            return invalid("budget_usd must be greater than 0");
        }

        Ok(())
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pricing for the configured model tier
    pub fn pricing(&self) -> Pricing {
        Pricing::new(self.input_cost_per_1k, self.output_cost_per_1k)
    }
}

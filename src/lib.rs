//! AI Translator - interactive translation with cost tracking
//!
//! Detects the language of free text and translates it through an
//! OpenAI-compatible chat API, keeping a per-session history, running
//! cost totals and a personal vocabulary that can be exported as CSV.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    client::{ChatBackend, LanguageService, OpenAiBackend},
    config::TranslatorConfig,
    controller::{InteractionController, Outcome, Stage, SubmitRequest},
    cost::{CostEstimate, Pricing},
    errors::TranslationError,
    models::{DetectedLanguage, TokenUsage, TranslationRecord, VocabularyEntry, VocabularyId},
    session::SessionStore,
    text::normalize_whitespace,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

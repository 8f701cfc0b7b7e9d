//! Core data models for translation

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display format shared by history, vocabulary and export
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Message role in a chat-completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat-completion request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Build the usual system-instruction + user-text pair
    pub fn new(
        model: impl Into<String>,
        instruction: impl Into<String>,
        text: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::system(instruction), ChatMessage::user(text)],
            max_tokens,
        }
    }
}

/// Chat-completion response body, only the parts we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Raw usage block; providers omit fields freely
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

#[cfg(test)]
impl ChatResponse {
    /// Response carrying a single message
    pub fn with_content(content: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            model: None,
            choices: vec![ChatChoice {
                message: ChatChoiceMessage {
                    content: Some(content.into()),
                },
            }],
            usage: usage.map(|u| ApiUsage {
                prompt_tokens: Some(u.input_tokens),
                completion_tokens: Some(u.output_tokens),
            }),
        }
    }
}

impl ChatResponse {
    /// Text of the first choice
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }

    /// Token usage, only when both counts were reported
    pub fn token_usage(&self) -> Option<TokenUsage> {
        let usage = self.usage.as_ref()?;
        Some(TokenUsage {
            input_tokens: usage.prompt_tokens?,
            output_tokens: usage.completion_tokens?,
        })
    }
}

/// Token usage reported for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Outcome of language detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedLanguage {
    Known(String),
    /// Detection failed; `reason` is shown to the user
    Unknown { reason: String },
}

impl DetectedLanguage {
    pub fn is_known(&self) -> bool {
        matches!(self, DetectedLanguage::Known(_))
    }

    /// Language name, or "Unknown"
    pub fn name(&self) -> &str {
        match self {
            DetectedLanguage::Known(name) => name,
            DetectedLanguage::Unknown { .. } => "Unknown",
        }
    }
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Successful translate call, before normalization
#[derive(Debug, Clone)]
pub struct TranslationOutput {
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub model: String,
}

/// Logged result of one translation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationRecord {
    pub timestamp: DateTime<Local>,
    pub source_text: String,
    pub target_text: String,
    pub source_language: String,
    pub target_language: String,
    pub cost: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Stable vocabulary entry identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VocabularyId(pub u64);

impl fmt::Display for VocabularyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Saved translation pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabularyEntry {
    pub id: VocabularyId,
    pub source_text: String,
    pub translation_text: String,
    pub source_language: String,
    pub target_language: String,
    pub added_at: DateTime<Local>,
}

/// Vocabulary entry before the store assigns its id
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyDraft {
    pub source_text: String,
    pub translation_text: String,
    pub source_language: String,
    pub target_language: String,
    pub added_at: DateTime<Local>,
}

impl VocabularyDraft {
    pub fn new(
        source_text: impl Into<String>,
        translation_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            translation_text: translation_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            added_at: Local::now(),
        }
    }

    pub(crate) fn into_entry(self, id: VocabularyId) -> VocabularyEntry {
        VocabularyEntry {
            id,
            source_text: self.source_text,
            translation_text: self.translation_text,
            source_language: self.source_language,
            target_language: self.target_language,
            added_at: self.added_at,
        }
    }
}

impl From<&TranslationRecord> for VocabularyDraft {
    fn from(record: &TranslationRecord) -> Self {
        Self::new(
            record.source_text.clone(),
            record.target_text.clone(),
            record.source_language.clone(),
            record.target_language.clone(),
        )
    }
}

/// Snapshot of the running totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub translations: usize,
    pub total_cost: f64,
    pub budget_usd: f64,
    pub budget_progress: f64,
    pub last_input_tokens: Option<u64>,
    pub last_output_tokens: Option<u64>,
    pub last_cost: Option<f64>,
    pub vocabulary_size: usize,
}

//! Request orchestration: validate, detect, translate, record

use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::client::LanguageService;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{
    DetectedLanguage, SessionStats, TranslationRecord, VocabularyDraft, VocabularyEntry,
    VocabularyId,
};
use crate::core::session::{vocabulary_export_file_name, SessionStore};
use crate::core::text::normalize_whitespace;

/// Stage of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    DetectingLanguage,
    Translating,
    Recording,
    Displayed,
    Rejected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::DetectingLanguage => "detecting language",
            Stage::Translating => "translating",
            Stage::Recording => "recording",
            Stage::Displayed => "displayed",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Severity of a user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Message shown to the user alongside a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// One translate action
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub text: String,
    pub target_language: String,
    pub api_key: Option<String>,
}

impl SubmitRequest {
    pub fn new(
        text: impl Into<String>,
        target_language: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
            api_key,
        }
    }
}

/// A successful translation ready for display
#[derive(Debug, Clone)]
pub struct TranslationView {
    /// 1-based position in the session history
    pub number: usize,
    pub record: TranslationRecord,
    pub notices: Vec<Notice>,
}

/// A request that ended without a record
#[derive(Debug)]
pub struct Rejection {
    /// Stage the request failed in
    pub stage: Stage,
    pub error: TranslationError,
    pub notices: Vec<Notice>,
}

/// Result of [`InteractionController::submit`]
#[derive(Debug)]
pub enum Outcome {
    Displayed(TranslationView),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_displayed(&self) -> bool {
        matches!(self, Outcome::Displayed(_))
    }

    pub fn notices(&self) -> &[Notice] {
        match self {
            Outcome::Displayed(view) => &view.notices,
            Outcome::Rejected(rejection) => &rejection.notices,
        }
    }
}

/// Drives one user session
#[derive(Debug)]
pub struct InteractionController {
    service: LanguageService,
    session: SessionStore,
    stage: Stage,
}

impl InteractionController {
    /// Start a session with an empty store
    pub fn new(service: LanguageService) -> Self {
        Self {
            service,
            session: SessionStore::new(),
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn enter(&mut self, next: Stage) {
        debug!("Request stage: {} -> {}", self.stage, next);
        self.stage = next;
    }

    fn reject(&mut self, error: TranslationError, mut notices: Vec<Notice>) -> Outcome {
        let stage = self.stage;
        warn!("Request rejected while {}: {}", stage, error);
        self.enter(Stage::Rejected);
        notices.push(Notice::error(match &error {
            TranslationError::InputValidation { message, .. } => message.clone(),
            other if other.is_remote() => format!("Translation error: {}", other),
            other => other.to_string(),
        }));
        Outcome::Rejected(Rejection {
            stage,
            error,
            notices,
        })
    }

    /// Handle one translate action from start to finish
    pub async fn submit(&mut self, request: SubmitRequest) -> Outcome {
        self.enter(Stage::Validating);

        let api_key = match request.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return self.reject(
                    TranslationError::InputValidation {
                        field: "api_key".to_string(),
                        message: "Please enter your OpenAI API key.".to_string(),
                    },
                    Vec::new(),
                )
            }
        };

        if request.text.trim().is_empty() {
            return self.reject(
                TranslationError::InputValidation {
                    field: "text".to_string(),
                    message: "Please enter some text to translate.".to_string(),
                },
                Vec::new(),
            );
        }

        let mut notices = Vec::new();

        self.enter(Stage::DetectingLanguage);
        let detected = self.service.detect_language(&request.text, &api_key).await;
        if let DetectedLanguage::Unknown { reason } = &detected {
            notices.push(Notice::error(format!("Language detection error: {}", reason)));
        }
        notices.push(Notice::info(format!("Detected language: {}", detected)));

        self.enter(Stage::Translating);
        let output = match self
            .service
            .translate(&request.text, &request.target_language, &api_key)
            .await
        {
            Ok(output) => output,
            Err(e) => return self.reject(e, notices),
        };

        self.enter(Stage::Recording);
        let estimate = self.service.config().pricing().estimate(output.usage.as_ref());
        let record = TranslationRecord {
            timestamp: Local::now(),
            source_text: request.text,
            target_text: normalize_whitespace(&output.text),
            source_language: detected.name().to_string(),
            target_language: request.target_language,
            cost: estimate.cost,
            input_tokens: estimate.input_tokens,
            output_tokens: estimate.output_tokens,
        };
        let number = self.session.append_translation(record.clone());

        info!(
            "Translation #{} {} -> {} via {} ({} + {} tokens, ${:.6})",
            number,
            record.source_language,
            record.target_language,
            output.model,
            record.input_tokens,
            record.output_tokens,
            record.cost
        );

        notices.push(Notice::success("Translation completed!"));
        notices.push(Notice::info(format!("Translation #{}", number)));
        self.enter(Stage::Displayed);

        Outcome::Displayed(TranslationView {
            number,
            record,
            notices,
        })
    }

    /// Save the translation on display to the vocabulary
    pub fn save_to_vocabulary(&mut self) -> Result<VocabularyId> {
        if self.stage != Stage::Displayed {
            return Err(TranslationError::NothingToSave);
        }
        let record = self
            .session
            .last_translation()
            .ok_or(TranslationError::NothingToSave)?;
        let draft = VocabularyDraft::from(record);
        Ok(self.session.append_vocabulary(draft))
    }

    pub fn remove_vocabulary(&mut self, id: VocabularyId) -> Result<VocabularyEntry> {
        self.session.remove_vocabulary(id)
    }

    pub fn vocabulary(&self) -> &[VocabularyEntry] {
        self.session.vocabulary()
    }

    /// Write the vocabulary to a timestamped CSV file in `dir`
    pub fn export_vocabulary(&self, dir: &Path) -> Result<PathBuf> {
        let csv = self.session.export_vocabulary_csv()?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(vocabulary_export_file_name(Local::now()));
        std::fs::write(&path, csv)?;
        info!("Vocabulary exported to {}", path.display());
        Ok(path)
    }

    pub fn stats(&self) -> SessionStats {
        self.session.stats(self.service.config().budget_usd)
    }

    /// Most recent translations, newest first, limited by configuration
    pub fn recent_translations(&self) -> Vec<(usize, &TranslationRecord)> {
        self.session
            .recent_translations(self.service.config().history_limit)
    }
}

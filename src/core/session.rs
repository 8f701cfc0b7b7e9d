//! Session-scoped translation history, vocabulary and running totals

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::{
    SessionStats, TranslationRecord, VocabularyDraft, VocabularyEntry, VocabularyId,
    TIMESTAMP_FORMAT,
};

/// Header row of the vocabulary export
pub const VOCABULARY_CSV_HEADER: [&str; 6] = [
    "id",
    "source",
    "translation",
    "source_lang",
    "target_lang",
    "added_date",
];

/// State owned by one user session
///
/// All mutation goes through `&mut self`, so one session has a single
/// writer. The translation count is the length of the history.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    translations: Vec<TranslationRecord>,
    vocabulary: Vec<VocabularyEntry>,
    total_cost: f64,
    next_vocabulary_id: u64,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished translation and add its cost to the total
    pub fn append_translation(&mut self, record: TranslationRecord) -> usize {
        self.total_cost += record.cost;
        self.translations.push(record);
        debug!(
            "Recorded translation #{}, total cost ${:.6}",
            self.translations.len(),
            self.total_cost
        );
        self.translations.len()
    }

    /// Add a vocabulary entry and return its id
    pub fn append_vocabulary(&mut self, draft: VocabularyDraft) -> VocabularyId {
        self.next_vocabulary_id += 1;
        let id = VocabularyId(self.next_vocabulary_id);
        self.vocabulary.push(draft.into_entry(id));
        debug!("Added vocabulary entry {}", id);
        id
    }

    /// Remove the entry with the given id
    pub fn remove_vocabulary(&mut self, id: VocabularyId) -> Result<VocabularyEntry> {
        let position = self
            .vocabulary
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(TranslationError::VocabularyNotFound { id: id.0 })?;
        let removed = self.vocabulary.remove(position);
        debug!("Removed vocabulary entry {}", id);
        Ok(removed)
    }

    /// Remove the entry at `index`; prefer [`SessionStore::remove_vocabulary`]
    pub fn remove_vocabulary_at(&mut self, index: usize) -> Result<VocabularyEntry> {
        if index >= self.vocabulary.len() {
            return Err(TranslationError::VocabularyIndexOutOfRange {
                index,
                len: self.vocabulary.len(),
            });
        }
        Ok(self.vocabulary.remove(index))
    }

    /// Serialize the vocabulary as CSV, header first
    pub fn export_vocabulary_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(VOCABULARY_CSV_HEADER)?;

        for entry in &self.vocabulary {
            writer.write_record([
                entry.id.to_string(),
                entry.source_text.clone(),
                entry.translation_text.clone(),
                entry.source_language.clone(),
                entry.target_language.clone(),
                entry.added_at.format(TIMESTAMP_FORMAT).to_string(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| TranslationError::InternalError(e.to_string()))?;
        let csv = String::from_utf8(bytes)
            .map_err(|e| TranslationError::InternalError(e.to_string()))?;

        info!("Exported {} vocabulary entries", self.vocabulary.len());
        Ok(csv)
    }

    pub fn translations(&self) -> &[TranslationRecord] {
        &self.translations
    }

    pub fn vocabulary(&self) -> &[VocabularyEntry] {
        &self.vocabulary
    }

    pub fn vocabulary_entry(&self, id: VocabularyId) -> Option<&VocabularyEntry> {
        self.vocabulary.iter().find(|entry| entry.id == id)
    }

    /// Number of recorded translations
    pub fn translation_count(&self) -> usize {
        self.translations.len()
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn last_translation(&self) -> Option<&TranslationRecord> {
        self.translations.last()
    }

    /// Up to `limit` most recent translations, newest first, with their 1-based number
    pub fn recent_translations(&self, limit: usize) -> Vec<(usize, &TranslationRecord)> {
        self.translations
            .iter()
            .enumerate()
            .rev()
            .take(limit)
            .map(|(i, record)| (i + 1, record))
            .collect()
    }

    /// Share of `budget_usd` spent so far, clamped to `[0, 1]`
    pub fn budget_progress(&self, budget_usd: f64) -> f64 {
        if budget_usd <= 0.0 {
            return 1.0;
        }
        (self.total_cost / budget_usd).clamp(0.0, 1.0)
    }

    /// Snapshot of the running totals
    pub fn stats(&self, budget_usd: f64) -> SessionStats {
        let last = self.last_translation();
        SessionStats {
            translations: self.translation_count(),
            total_cost: self.total_cost,
            budget_usd,
            budget_progress: self.budget_progress(budget_usd),
            last_input_tokens: last.map(|r| r.input_tokens),
            last_output_tokens: last.map(|r| r.output_tokens),
            last_cost: last.map(|r| r.cost),
            vocabulary_size: self.vocabulary.len(),
        }
    }
}

/// File name for a vocabulary export made at `now`
pub fn vocabulary_export_file_name(now: DateTime<Local>) -> String {
    format!("vocabulary_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

//! Plain-text rendering of controller view-models

use std::fmt::Write;

use crate::core::controller::{Notice, NoticeLevel, Outcome};
use crate::core::models::{SessionStats, TranslationRecord, VocabularyEntry, TIMESTAMP_FORMAT};

const BAR_WIDTH: usize = 20;

fn notice_line(notice: &Notice) -> String {
    let icon = match notice.level {
        NoticeLevel::Info => "ℹ️ ",
        NoticeLevel::Success => "✅",
        NoticeLevel::Error => "❌",
    };
    format!("{} {}", icon, notice.message)
}

/// Notices, then the translation and its cost when there is one
pub fn render_outcome(outcome: &Outcome) -> String {
    let mut out = String::new();
    for notice in outcome.notices() {
        let _ = writeln!(out, "{}", notice_line(notice));
    }

    if let Outcome::Displayed(view) = outcome {
        let record = &view.record;
        let _ = writeln!(out, "\nTranslation:\n{}\n", record.target_text);
        let _ = writeln!(
            out,
            "Cost: ${:.6} | Tokens: {}+{}",
            record.cost, record.input_tokens, record.output_tokens
        );
    }

    out
}

/// Saved vocabulary, one entry per block
pub fn render_vocabulary(entries: &[VocabularyEntry]) -> String {
    if entries.is_empty() {
        return "No vocabulary items yet. Add some translations to build your personal dictionary!\n"
            .to_string();
    }

    let mut out = String::from("📚 My Vocabulary\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "[{}] {} → {}\n     {} → {} | Added: {}",
            entry.id,
            entry.source_text,
            entry.translation_text,
            entry.source_language,
            entry.target_language,
            entry.added_at.format(TIMESTAMP_FORMAT)
        );
    }
    out
}

/// Recent translations as returned by the store, newest first
pub fn render_history(recent: &[(usize, &TranslationRecord)]) -> String {
    if recent.is_empty() {
        return "No translations yet. Start translating to see your history here!\n".to_string();
    }

    let mut out = String::from("🕒 Recent Translations\n");
    for (number, record) in recent {
        let _ = writeln!(
            out,
            "Translation {} - {}\n  Source ({}): {}\n  Translation ({}): {}\n  Cost: ${:.6} | Tokens: {}+{}",
            number,
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.source_language,
            record.source_text,
            record.target_language,
            record.target_text,
            record.cost,
            record.input_tokens,
            record.output_tokens
        );
    }
    out
}

/// Text bar for a fraction in `[0, 1]`
pub fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Running totals and the last call's usage
pub fn render_stats(stats: &SessionStats) -> String {
    let mut out = String::from("📊 Statistics\n");
    if let (Some(input), Some(output), Some(cost)) =
        (stats.last_input_tokens, stats.last_output_tokens, stats.last_cost)
    {
        let _ = writeln!(out, "  Input Tokens:  {}", input);
        let _ = writeln!(out, "  Output Tokens: {}", output);
        let _ = writeln!(out, "  Last Cost:     ${:.4}", cost);
    }
    let _ = writeln!(out, "  Total Cost:    ${:.4}", stats.total_cost);
    let _ = writeln!(
        out,
        "  Usage: {} {:.4}/${:.2}",
        progress_bar(stats.budget_progress),
        stats.total_cost,
        stats.budget_usd
    );
    let _ = writeln!(out, "  Translations:  {}", stats.translations);
    let _ = writeln!(out, "  Vocabulary:    {}", stats.vocabulary_size);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controller::{Rejection, Stage, TranslationView};
    use crate::core::errors::TranslationError;
    use crate::core::models::VocabularyId;
    use chrono::{Local, TimeZone};

    fn record() -> TranslationRecord {
        TranslationRecord {
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            source_text: "Hello world".to_string(),
            target_text: "Bonjour le monde".to_string(),
            source_language: "English".to_string(),
            target_language: "French".to_string(),
            cost: 0.0000031,
            input_tokens: 5,
            output_tokens: 4,
        }
    }

    #[test]
    fn test_render_displayed_outcome() {
        let outcome = Outcome::Displayed(TranslationView {
            number: 1,
            record: record(),
            notices: vec![Notice::success("Translation completed!")],
        });
        let text = render_outcome(&outcome);

        assert!(text.contains("✅ Translation completed!"));
        assert!(text.contains("Bonjour le monde"));
        assert!(text.contains("Cost: $0.000003 | Tokens: 5+4"));
    }

    #[test]
    fn test_render_rejected_outcome() {
        let outcome = Outcome::Rejected(Rejection {
            stage: Stage::Validating,
            error: TranslationError::NothingToSave,
            notices: vec![Notice::error("Please enter some text to translate.")],
        });
        let text = render_outcome(&outcome);

        assert_eq!(text, "❌ Please enter some text to translate.\n");
    }

    #[test]
    fn test_render_vocabulary() {
        assert!(render_vocabulary(&[]).starts_with("No vocabulary items yet"));

        let entry = VocabularyEntry {
            id: VocabularyId(3),
            source_text: "cat".to_string(),
            translation_text: "kot".to_string(),
            source_language: "English".to_string(),
            target_language: "Polish".to_string(),
            added_at: Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        };
        let text = render_vocabulary(&[entry]);
        assert!(text.contains("[3] cat → kot"));
        assert!(text.contains("English → Polish | Added: 2024-05-01 09:30:00"));
    }

    #[test]
    fn test_render_history() {
        assert!(render_history(&[]).starts_with("No translations yet"));

        let record = record();
        let text = render_history(&[(2, &record)]);
        assert!(text.contains("Translation 2 - 2024-05-01 09:30:00"));
        assert!(text.contains("Source (English): Hello world"));
        assert!(text.contains("Translation (French): Bonjour le monde"));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), format!("[{}]", ".".repeat(20)));
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(0.5), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
        assert_eq!(progress_bar(7.0), progress_bar(1.0));
    }

    #[test]
    fn test_render_stats() {
        let stats = SessionStats {
            translations: 0,
            total_cost: 0.0,
            budget_usd: 1.0,
            budget_progress: 0.0,
            last_input_tokens: None,
            last_output_tokens: None,
            last_cost: None,
            vocabulary_size: 0,
        };
        let text = render_stats(&stats);
        assert!(text.contains("Total Cost:    $0.0000"));
        assert!(text.contains("0.0000/$1.00"));
        assert!(!text.contains("Input Tokens"));
    }
}

//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// User input rejected before any remote call
    #[error("Invalid input: {field} - {message}")]
    InputValidation {
        field: String,
        message: String,
    },

    /// API request failed
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Credential rejected by the API
    #[error("Authentication failed: {message}")]
    AuthError {
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after:?} seconds")]
    RateLimitError {
        retry_after: Option<u64>,
    },

    /// Token quota exceeded
    #[error("Token quota exceeded")]
    QuotaExceededError,

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },

    /// Request timeout
    #[error("Request timeout after {timeout_ms} ms")]
    TimeoutError {
        timeout_ms: u64,
    },

    /// No vocabulary entry carries this id
    #[error("Vocabulary entry not found: {id}")]
    VocabularyNotFound {
        id: u64,
    },

    /// Positional delete past the end of the vocabulary
    #[error("Vocabulary index {index} out of range (len {len})")]
    VocabularyIndexOutOfRange {
        index: usize,
        len: usize,
    },

    /// Save requested with no translation on display
    #[error("No translation to save; translate something first")]
    NothingToSave,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl TranslationError {
    /// Whether the error came from talking to the remote API
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            TranslationError::ApiError { .. }
                | TranslationError::AuthError { .. }
                | TranslationError::RateLimitError { .. }
                | TranslationError::QuotaExceededError
                | TranslationError::NetworkError { .. }
                | TranslationError::InvalidResponseError { .. }
                | TranslationError::TimeoutError { .. }
                | TranslationError::HttpError(_)
        )
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_classification() {
        assert!(TranslationError::TimeoutError { timeout_ms: 10 }.is_remote());
        assert!(TranslationError::NetworkError {
            message: "reset".to_string()
        }
        .is_remote());
        assert!(!TranslationError::NothingToSave.is_remote());
        assert!(!TranslationError::InputValidation {
            field: "text".to_string(),
            message: "empty".to_string(),
        }
        .is_remote());
    }

    #[test]
    fn test_error_messages() {
        let err = TranslationError::VocabularyIndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "Vocabulary index 4 out of range (len 2)");

        let err = TranslationError::ApiError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }
}

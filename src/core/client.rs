//! Language-model client: language detection and translation

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ChatRequest, ChatResponse, DetectedLanguage, TranslationOutput};

/// System instruction for language detection
pub const DETECT_INSTRUCTION: &str = "Detect the language of the given text. Respond with only the language name in English (e.g., 'English', 'Polish', 'Spanish', etc.).";

/// System instruction for translation into `target_language`
pub fn translate_instruction(target_language: &str) -> String {
    format!(
        "Translate the following text to {}. Provide only the translation without any explanations.",
        target_language
    )
}

/// Transport to a chat-completion API
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one request; a single attempt, no retry
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<ChatResponse>;
}

/// OpenAI-compatible HTTP backend
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    endpoint: String,
    timeout_ms: u64,
}

impl OpenAiBackend {
    /// Create a new backend
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn classify_failure(status_code: u16, error_text: String) -> TranslationError {
        match status_code {
            401 | 403 => TranslationError::AuthError {
                message: error_text,
            },
            429 if error_text.contains("insufficient_quota") => {
                TranslationError::QuotaExceededError
            }
            429 => TranslationError::RateLimitError { retry_after: None },
            _ if error_text.contains("quota") => TranslationError::QuotaExceededError,
            _ => TranslationError::ApiError {
                status: status_code,
                message: error_text,
            },
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::TimeoutError {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    TranslationError::NetworkError {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let parsed: ChatResponse =
                response
                    .json()
                    .await
                    .map_err(|e| TranslationError::InvalidResponseError {
                        message: e.to_string(),
                    })?;
            Ok(parsed)
        } else {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();
            Err(Self::classify_failure(status_code, error_text))
        }
    }
}

/// Detection and translation on top of a [`ChatBackend`]
#[derive(Clone)]
pub struct LanguageService {
    backend: Arc<dyn ChatBackend>,
    config: Arc<TranslatorConfig>,
}

impl LanguageService {
    /// Create a service over any backend
    pub fn new(backend: Arc<dyn ChatBackend>, config: TranslatorConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }

    /// Create a service talking HTTP to the configured endpoint
    pub fn from_config(config: TranslatorConfig) -> Result<Self> {
        config.validate()?;
        let backend = OpenAiBackend::new(&config)?;
        Ok(Self::new(Arc::new(backend), config))
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Detect the language of `text`; failures become `Unknown`
    pub async fn detect_language(&self, text: &str, api_key: &str) -> DetectedLanguage {
        let request = ChatRequest::new(
            self.config.model.clone(),
            DETECT_INSTRUCTION,
            text,
            self.config.detect_max_tokens,
        );

        match self.call(api_key, &request).await {
            Ok(response) => match response.content().map(str::trim) {
                Some(name) if !name.is_empty() => {
                    debug!("Detected language: {}", name);
                    DetectedLanguage::Known(name.to_string())
                }
                _ => {
                    warn!("Language detection returned no text");
                    DetectedLanguage::Unknown {
                        reason: "empty response".to_string(),
                    }
                }
            },
            Err(e) => {
                warn!("Language detection failed: {}", e);
                DetectedLanguage::Unknown {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Translate `text` into `target_language`
    pub async fn translate(
        &self,
        text: &str,
        target_language: &str,
        api_key: &str,
    ) -> Result<TranslationOutput> {
        let request = ChatRequest::new(
            self.config.model.clone(),
            translate_instruction(target_language),
            text,
            self.config.translate_max_tokens,
        );

        let response = self.call(api_key, &request).await?;

        let translated = response
            .content()
            .ok_or_else(|| TranslationError::InvalidResponseError {
                message: "No translation in response".to_string(),
            })?
            .to_string();

        let usage = response.token_usage();
        if usage.is_none() {
            debug!("Response carried no usage report");
        }

        Ok(TranslationOutput {
            text: translated,
            usage,
            model: response
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
        })
    }

    /// One bounded attempt against the backend
    async fn call(&self, api_key: &str, request: &ChatRequest) -> Result<ChatResponse> {
        let timeout = self.config.timeout();
        match tokio::time::timeout(timeout, self.backend.complete(api_key, request)).await {
            Ok(result) => result,
            Err(_) => Err(TranslationError::TimeoutError {
                timeout_ms: self.config.timeout_ms,
            }),
        }
    }
}

impl std::fmt::Debug for LanguageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageService")
            .field("model", &self.config.model)
            .field("endpoint", &self.config.api_endpoint)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use crate::core::models::TokenUsage;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn service(backend: Arc<ScriptedBackend>) -> LanguageService {
        LanguageService::new(backend, TranslatorConfig::default())
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest::new("gpt-4o-mini", translate_instruction("French"), "Hello world", 1000);
        assert_json_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "Translate the following text to French. Provide only the translation without any explanations."},
                    {"role": "user", "content": "Hello world"}
                ],
                "max_tokens": 1000
            })
        );
    }

    #[tokio::test]
    async fn test_detect_language_trims_answer() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(ChatResponse::with_content(
            "  English\n",
            None,
        ))]));
        let detected = service(backend.clone()).detect_language("Hello", "sk-x").await;

        assert_eq!(detected, DetectedLanguage::Known("English".to_string()));
        let requests = backend.requests.lock().unwrap();
        let (key, request) = &requests[0];
        assert_eq!(key, "sk-x");
        assert_eq!(request.max_tokens, 50);
        assert_eq!(request.messages[0].content, DETECT_INSTRUCTION);
        assert_eq!(request.messages[1].content, "Hello");
    }

    #[tokio::test]
    async fn test_detect_language_failure_is_unknown() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(TranslationError::AuthError {
            message: "bad key".to_string(),
        })]));
        let detected = service(backend).detect_language("Hello", "sk-x").await;

        match detected {
            DetectedLanguage::Unknown { reason } => assert!(reason.contains("bad key")),
            other => panic!("expected Unknown, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_detect_language_blank_answer_is_unknown() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(ChatResponse::with_content(
            "   ", None,
        ))]));
        let detected = service(backend).detect_language("Hello", "sk-x").await;
        assert!(!detected.is_known());
    }

    #[tokio::test]
    async fn test_translate_returns_raw_text_and_usage() {
        let usage = TokenUsage {
            input_tokens: 5,
            output_tokens: 4,
        };
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(ChatResponse::with_content(
            " Bonjour  le monde ",
            Some(usage),
        ))]));
        let output = service(backend.clone())
            .translate("Hello world", "French", "sk-x")
            .await
            .unwrap();

        assert_eq!(output.text, " Bonjour  le monde ");
        assert_eq!(output.usage, Some(usage));
        assert_eq!(output.model, "gpt-4o-mini");
        assert_eq!(backend.requests.lock().unwrap()[0].1.max_tokens, 1000);
    }

    #[tokio::test]
    async fn test_translate_without_choices_is_invalid() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(ChatResponse::default())]));
        let result = service(backend).translate("Hello", "French", "sk-x").await;
        assert!(matches!(
            result,
            Err(TranslationError::InvalidResponseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_call_is_bounded_by_timeout() {
        let backend = Arc::new(
            ScriptedBackend::new(vec![Ok(ChatResponse::with_content("late", None))])
                .with_delay(Duration::from_secs(5)),
        );
        let config = TranslatorConfig {
            timeout_ms: 20,
            ..Default::default()
        };
        let service = LanguageService::new(backend, config);

        let result = service.translate("Hello", "French", "sk-x").await;
        assert!(matches!(
            result,
            Err(TranslationError::TimeoutError { timeout_ms: 20 })
        ));
    }

    #[test]
    fn test_failure_classification() {
        assert!(matches!(
            OpenAiBackend::classify_failure(401, "invalid_api_key".to_string()),
            TranslationError::AuthError { .. }
        ));
        assert!(matches!(
            OpenAiBackend::classify_failure(429, "slow down".to_string()),
            TranslationError::RateLimitError { .. }
        ));
        assert!(matches!(
            OpenAiBackend::classify_failure(429, "insufficient_quota".to_string()),
            TranslationError::QuotaExceededError
        ));
        assert!(matches!(
            OpenAiBackend::classify_failure(500, "oops".to_string()),
            TranslationError::ApiError { status: 500, .. }
        ));
    }

    #[test]
    fn test_service_from_config() {
        let service = LanguageService::from_config(TranslatorConfig::default());
        assert!(service.is_ok());
    }
}

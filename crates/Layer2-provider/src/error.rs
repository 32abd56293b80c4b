//! Provider-specific error types
//!
//! ProviderError는 LLM 제공자 관련 세부 에러를 관리합니다.
//! repolens_foundation::Error로 변환될 때는 두 종류로만 나뉩니다:
//! 입력 초과는 `ContextTooLarge`, 나머지는 모두 `ModelUnavailable`.

use repolens_foundation::Error as FoundationError;
use thiserror::Error;

/// Errors that can occur during provider operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// API key is missing or invalid
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded{}", .retry_after_ms.map(|ms| format!(", retry after {}ms", ms)).unwrap_or_default())]
    RateLimited { retry_after_ms: Option<u64> },

    /// Input does not fit the model's context window
    #[error("Context length exceeded: {0}")]
    ContextLengthExceeded(String),

    /// Server error (5xx, overloaded)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Request failed (network, timeout, etc.)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Invalid request (bad parameters)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found or not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Streaming error
    #[error("Stream error: {0}")]
    StreamError(String),

    /// JSON parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Provider not configured
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Create from HTTP status code and body
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => ProviderError::Authentication(summarize(body)),
            413 => ProviderError::ContextLengthExceeded(summarize(body)),
            429 => ProviderError::RateLimited {
                retry_after_ms: extract_retry_after(body),
            },
            400 => {
                if is_length_complaint(body) {
                    ProviderError::ContextLengthExceeded(summarize(body))
                } else {
                    ProviderError::InvalidRequest(summarize(body))
                }
            }
            404 => ProviderError::ModelNotAvailable(summarize(body)),
            500..=599 => ProviderError::ServerError(summarize(body)),
            _ => ProviderError::Unknown(format!("HTTP {}: {}", status, summarize(body))),
        }
    }

    /// Create from an `error` event delivered inside an SSE stream
    pub fn from_stream_error(error_type: &str, message: &str) -> Self {
        match error_type {
            "overloaded_error" | "api_error" => ProviderError::ServerError(message.to_string()),
            "rate_limit_error" => ProviderError::RateLimited {
                retry_after_ms: None,
            },
            "authentication_error" | "permission_error" => {
                ProviderError::Authentication(message.to_string())
            }
            "request_too_large" => ProviderError::ContextLengthExceeded(message.to_string()),
            "invalid_request_error" if is_length_complaint(message) => {
                ProviderError::ContextLengthExceeded(message.to_string())
            }
            _ => ProviderError::StreamError(format!("{}: {}", error_type, message)),
        }
    }

    pub fn is_context_length(&self) -> bool {
        matches!(self, ProviderError::ContextLengthExceeded(_))
    }
}

/// "prompt is too long: 210000 tokens > 200000 maximum"
fn is_length_complaint(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("too long") || lower.contains("context length") || lower.contains("context window")
}

/// Anthropic error bodies: `{"type":"error","error":{"type":"...","message":"..."}}`
fn summarize(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(300).collect())
}

/// Try to extract retry-after value from error body (in milliseconds)
fn extract_retry_after(body: &str) -> Option<u64> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    let secs = json
        .get("error")
        .and_then(|e| e.get("retry_after"))
        .and_then(|v| v.as_f64())?;
    Some((secs * 1000.0) as u64)
}

// ============================================================================
// repolens_foundation::Error 변환
// ============================================================================

impl From<ProviderError> for FoundationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::ContextLengthExceeded(msg) => FoundationError::ContextTooLarge(msg),
            other => FoundationError::ModelUnavailable(other.to_string()),
        }
    }
}

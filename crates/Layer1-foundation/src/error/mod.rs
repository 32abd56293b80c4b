//! Error types for RepoLens
//!
//! 파이프라인의 모든 실패를 하나의 분류 체계로 관리합니다.
//! 경계(CLI/HTTP)는 `kind()`와 `bucket()`만 보고 응답을 결정할 수 있어야 합니다.

use serde::Serialize;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// RepoLens 에러 타입
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // 호출자 입력 관련
    // ========================================================================
    #[error("Invalid repository reference: {0}")]
    InvalidReference(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ========================================================================
    // Hosting API 관련
    // ========================================================================
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Rate limited: {message}{}", .reset_at.map(|ts| format!(" (resets at {})", ts)).unwrap_or_default())]
    RateLimited {
        message: String,
        /// Unix timestamp at which the hosting quota resets, when reported
        reset_at: Option<u64>,
    },

    #[error("Tree too large: more than {limit} entries")]
    TreeTooLarge { limit: usize },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Hosting API unavailable: {0}")]
    HostingUnavailable(String),

    // ========================================================================
    // Model API 관련
    // ========================================================================
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Context too large: {0}")]
    ContextTooLarge(String),

    // ========================================================================
    // 설정
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Kind tag carried by every failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidReference,
    InvalidRequest,
    RepositoryNotFound,
    AccessDenied,
    RateLimited,
    TreeTooLarge,
    FileNotFound,
    HostingUnavailable,
    ModelUnavailable,
    ContextTooLarge,
    Config,
}

/// Coarse grouping the boundary maps to transport-level status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBucket {
    /// Bad URL, empty prompt, oversized context: the caller can fix it
    CallerCorrectable,
    /// Missing or private repository, insufficient credentials
    NotFoundOrDenied,
    /// Hosting or model API is failing or throttling
    ExternalService,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidReference => "invalid_reference",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::RepositoryNotFound => "repository_not_found",
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::TreeTooLarge => "tree_too_large",
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::HostingUnavailable => "hosting_unavailable",
            ErrorKind::ModelUnavailable => "model_unavailable",
            ErrorKind::ContextTooLarge => "context_too_large",
            ErrorKind::Config => "config",
        }
    }

    pub fn bucket(&self) -> ErrorBucket {
        match self {
            ErrorKind::InvalidReference
            | ErrorKind::InvalidRequest
            | ErrorKind::TreeTooLarge
            | ErrorKind::ContextTooLarge => ErrorBucket::CallerCorrectable,
            ErrorKind::RepositoryNotFound | ErrorKind::AccessDenied | ErrorKind::FileNotFound => {
                ErrorBucket::NotFoundOrDenied
            }
            ErrorKind::RateLimited
            | ErrorKind::HostingUnavailable
            | ErrorKind::ModelUnavailable
            | ErrorKind::Config => ErrorBucket::ExternalService,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidReference(_) => ErrorKind::InvalidReference,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::RepositoryNotFound(_) => ErrorKind::RepositoryNotFound,
            Error::AccessDenied(_) => ErrorKind::AccessDenied,
            Error::RateLimited { .. } => ErrorKind::RateLimited,
            Error::TreeTooLarge { .. } => ErrorKind::TreeTooLarge,
            Error::FileNotFound(_) => ErrorKind::FileNotFound,
            Error::HostingUnavailable(_) => ErrorKind::HostingUnavailable,
            Error::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Error::ContextTooLarge(_) => ErrorKind::ContextTooLarge,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    pub fn bucket(&self) -> ErrorBucket {
        self.kind().bucket()
    }

    /// Soft failures are absorbed by the component that sees them
    pub fn is_soft(&self) -> bool {
        matches!(self, Error::FileNotFound(_))
    }

    /// Rate limit 에러 생성 헬퍼
    pub fn rate_limited(message: impl Into<String>, reset_at: Option<u64>) -> Self {
        Error::RateLimited {
            message: message.into(),
            reset_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_bucket() {
        let err = Error::InvalidReference("https://example.com/x".to_string());
        assert_eq!(err.kind(), ErrorKind::InvalidReference);
        assert_eq!(err.bucket(), ErrorBucket::CallerCorrectable);

        let err = Error::ContextTooLarge("prompt is too long".to_string());
        assert_eq!(err.bucket(), ErrorBucket::CallerCorrectable);

        let err = Error::rate_limited("quota exhausted", Some(1_700_000_000));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(err.bucket(), ErrorBucket::ExternalService);

        let err = Error::AccessDenied("private".to_string());
        assert_eq!(err.bucket(), ErrorBucket::NotFoundOrDenied);
    }

    #[test]
    fn test_rate_limited_display() {
        let err = Error::rate_limited("quota exhausted", Some(42));
        assert_eq!(err.to_string(), "Rate limited: quota exhausted (resets at 42)");

        let err = Error::rate_limited("quota exhausted", None);
        assert_eq!(err.to_string(), "Rate limited: quota exhausted");
    }

    #[test]
    fn test_only_file_not_found_is_soft() {
        assert!(Error::FileNotFound("a.txt".to_string()).is_soft());
        assert!(!Error::RepositoryNotFound("o/r".to_string()).is_soft());
        assert!(!Error::TreeTooLarge { limit: 10 }.is_soft());
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        let json = serde_json::to_string(&ErrorKind::ContextTooLarge).unwrap();
        assert_eq!(json, "\"context_too_large\"");
        assert_eq!(ErrorKind::TreeTooLarge.to_string(), "tree_too_large");
    }
}

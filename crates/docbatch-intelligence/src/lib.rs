#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

use std::time::Duration;

// Tracing targets for observability
/// Logging target for client construction and submissions.
pub const TRACING_TARGET_CLIENT: &str = "docbatch_intelligence::client";

/// Logging target for long-running operation polling.
pub const TRACING_TARGET_POLLER: &str = "docbatch_intelligence::poller";

pub mod client;
pub mod models;

pub use client::{AnalyzePoller, BoxedAnalyzer, DiClient, DiConfig, DocumentAnalyzer};
pub use models::{
    AnalyzeDocumentRequest, AnalyzeOperation, AnalyzeResult, BoundingRegion,
    DocumentAnalysisFeature, DocumentLanguage, DocumentLine, DocumentPage, DocumentParagraph,
    DocumentSpan, DocumentWord, LengthUnit, OperationStatus, ServiceError,
};

/// Result type for all Document Intelligence operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure modes when talking to the Document Intelligence service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client errors (connection, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
        /// Error code from the service envelope, if any
        code: Option<String>,
    },

    /// The service answered, but not with what the protocol requires.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of what's invalid
        message: String,
        /// Raw response body for debugging
        body: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// The analysis operation reached a `failed` or `canceled` state.
    #[error("Analysis {status}: {message}")]
    AnalysisFailed {
        /// Terminal status reported by the operation
        status: OperationStatus,
        /// Error code reported by the operation, if any
        code: Option<String>,
        /// Error message reported by the operation
        message: String,
    },
}

impl Error {
    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            code,
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>, body: Option<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            body,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an error for an operation that ended unsuccessfully.
    pub fn analysis_failed(
        status: OperationStatus,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::AnalysisFailed {
            status,
            code,
            message: message.into(),
        }
    }

    /// Check if this error indicates a temporary failure that might succeed on retry
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            Error::Api { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            Error::InvalidResponse { .. }
            | Error::Serialization(_)
            | Error::Config { .. }
            | Error::AnalysisFailed { .. } => false,
        }
    }

    /// Get the HTTP status code if this is an HTTP/API error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Service error code, if the service provided one.
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Error::Api { code, .. } | Error::AnalysisFailed { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Http(_) => "http",
            Error::Api { .. } => "api",
            Error::InvalidResponse { .. } => "invalid_response",
            Error::Serialization(_) => "serialization",
            Error::Config { .. } => "config",
            Error::AnalysisFailed { .. } => "analysis_failed",
        }
    }
}

/// Parses a `Retry-After` header given in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    use super::*;

    #[test]
    fn test_error_categories() {
        let api_err = Error::api(500, "Internal server error", None);
        assert_eq!(api_err.category(), "api");
        assert!(api_err.is_retryable());

        let config_err = Error::config("Missing API key");
        assert_eq!(config_err.category(), "config");
        assert!(!config_err.is_retryable());

        let failed = Error::analysis_failed(
            OperationStatus::Failed,
            Some("InvalidContent".into()),
            "The file is corrupted",
        );
        assert_eq!(failed.category(), "analysis_failed");
        assert_eq!(failed.service_code(), Some("InvalidContent"));
        assert!(!failed.is_retryable());
        assert_eq!(failed.to_string(), "Analysis failed: The file is corrupted");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(Error::api(429, "Rate limited", None).is_retryable());
        assert!(Error::api(503, "Service unavailable", None).is_retryable());
        assert!(!Error::api(400, "Bad request", None).is_retryable());
        assert!(!Error::api(401, "Unauthorized", None).is_retryable());
    }

    #[test]
    fn test_status_code() {
        assert_eq!(Error::api(404, "Not found", None).status_code(), Some(404));
        assert_eq!(Error::config("x").status_code(), None);
    }

    #[test]
    fn test_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(2)));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }
}

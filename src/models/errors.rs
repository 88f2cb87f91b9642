//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so production logs can be
//! filtered without parsing free-form messages.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - URL_xxx: URL parsing / extraction errors
//! - MODEL_xxx: model lifecycle errors
//! - BATCH_xxx / API_xxx: request validation errors
//! - DOWNLOAD_xxx: artifact acquisition errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Extraction Errors
    // ============================================
    /// URL could not be parsed into domain/path structure
    UrlUnparseable,

    // ============================================
    // Model Lifecycle Errors
    // ============================================
    /// No model bundle is loaded (service cannot classify)
    ModelUnavailable,
    /// Model metadata was never obtained
    MetadataUnavailable,
    /// No artifact found locally after acquisition
    ArtifactMissing,
    /// Artifact exists but the session could not be built from it
    ModelLoadFailed,
    /// Model run failed or produced no usable output
    InferenceFailed,

    // ============================================
    // Request Validation Errors
    // ============================================
    /// Batch request exceeds the per-request URL cap
    BatchTooLarge,

    // ============================================
    // Acquisition Errors
    // ============================================
    /// Remote artifact exceeded the configured byte ceiling
    DownloadTooLarge,
    /// Remote fetch failed (network, HTTP status)
    DownloadFailed,

    // ============================================
    // Generic Errors
    // ============================================
    /// Filesystem error
    Io,
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrlUnparseable => "URL_UNPARSEABLE",
            Self::ModelUnavailable => "MODEL_UNAVAILABLE",
            Self::MetadataUnavailable => "METADATA_UNAVAILABLE",
            Self::ArtifactMissing => "ARTIFACT_MISSING",
            Self::ModelLoadFailed => "MODEL_LOAD_FAILED",
            Self::InferenceFailed => "INFERENCE_FAILED",
            Self::BatchTooLarge => "BATCH_TOO_LARGE",
            Self::DownloadTooLarge => "DOWNLOAD_TOO_LARGE",
            Self::DownloadFailed => "DOWNLOAD_FAILED",
            Self::Io => "IO_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UrlUnparseable | Self::BatchTooLarge => 400,
            Self::ModelUnavailable | Self::MetadataUnavailable | Self::ArtifactMissing => 503,
            Self::DownloadTooLarge | Self::DownloadFailed => 502,
            _ => 500,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// URL could not be parsed
    pub fn url_unparseable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UrlUnparseable, msg)
    }

    /// No model loaded
    pub fn model_unavailable() -> Self {
        Self::new(ErrorCode::ModelUnavailable, "Model not loaded")
    }

    /// No metadata loaded
    pub fn metadata_unavailable() -> Self {
        Self::new(ErrorCode::MetadataUnavailable, "Model metadata not loaded")
    }

    /// No artifact after exhausting local paths and remote sources
    pub fn artifact_missing(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ArtifactMissing, msg)
    }

    /// Session construction failed
    pub fn model_load_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelLoadFailed, msg)
    }

    /// Inference failed
    pub fn inference_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InferenceFailed, msg)
    }

    /// Batch over the URL cap
    pub fn batch_too_large(len: usize, max: usize) -> Self {
        Self::new(
            ErrorCode::BatchTooLarge,
            format!("Maximum {} URLs per batch (got {})", max, len),
        )
    }

    /// Download exceeded its byte ceiling
    pub fn download_too_large(url: &str, received: u64, max_bytes: u64) -> Self {
        Self::new(
            ErrorCode::DownloadTooLarge,
            format!(
                "Download of {} exceeds maximum allowed size ({} > {} bytes)",
                url, received, max_bytes
            ),
        )
    }

    /// Remote fetch failed
    pub fn download_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DownloadFailed, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Io, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        Self::with_source(ErrorCode::DownloadFailed, message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::url_unparseable("no host");
        assert_eq!(err.code, ErrorCode::UrlUnparseable);
        assert_eq!(err.code_str(), "URL_UNPARSEABLE");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::UrlUnparseable.http_status(), 400);
        assert_eq!(ErrorCode::BatchTooLarge.http_status(), 400);
        assert_eq!(ErrorCode::ModelUnavailable.http_status(), 503);
        assert_eq!(ErrorCode::DownloadTooLarge.http_status(), 502);
        assert_eq!(ErrorCode::InferenceFailed.http_status(), 500);
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::batch_too_large(101, 100);
        let rendered = err.to_string();
        assert!(rendered.contains("BATCH_TOO_LARGE"));
        assert!(rendered.contains("101"));
    }
}

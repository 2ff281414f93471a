//! Custom error types for Mender.
//!
//! This module provides structured error types that enable better
//! error handling, reporting, and recovery throughout the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Mender operations
#[derive(Error, Debug)]
pub enum MenderError {
    // =========================================================================
    // Request Validation Errors
    // =========================================================================
    /// A required request field is missing or empty
    #[error("Invalid request: {field} - {reason}")]
    InvalidRequest { field: String, reason: String },

    /// The requested language is not supported by the pipeline
    #[error("Unsupported language: '{language}'")]
    UnsupportedLanguage {
        language: String,
        supported: Vec<String>,
    },

    // =========================================================================
    // Pipeline Errors
    // =========================================================================
    /// Fix generation or application failed
    #[error("Fix failed: {message}")]
    FixFailed { message: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Durable store read/write failed. Callers on the request path log and
    /// swallow this variant; it must never fail a fix request.
    #[error("Storage error: {message}")]
    Storage { message: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MenderError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create an invalid-request error
    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported-language error carrying the supported set
    pub fn unsupported_language(language: impl Into<String>, supported: Vec<String>) -> Self {
        Self::UnsupportedLanguage {
            language: language.into(),
            supported,
        }
    }

    /// Create a fix-failure error
    pub fn fix_failed(message: impl Into<String>) -> Self {
        Self::FixFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path
    pub fn config_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if this error is the caller's fault (the 400-equivalent class)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::UnsupportedLanguage { .. }
        )
    }

    /// Check if this error is recoverable without operator intervention
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::UnsupportedLanguage { .. }
                | Self::FixFailed { .. }
                | Self::Storage { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidRequest { .. } | Self::UnsupportedLanguage { .. } => 2,
            Self::FixFailed { .. } => 3,
            Self::Config { .. } | Self::InvalidConfig { .. } => 7,
            _ => 1,
        }
    }
}

/// Type alias for Mender results
pub type Result<T> = std::result::Result<T, MenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MenderError::invalid_request("code", "must not be empty");
        assert!(err.to_string().contains("code"));
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_unsupported_language_carries_supported_set() {
        let err = MenderError::unsupported_language("cobol", vec!["javascript".to_string()]);
        if let MenderError::UnsupportedLanguage {
            language,
            supported,
        } = err
        {
            assert_eq!(language, "cobol");
            assert_eq!(supported, vec!["javascript".to_string()]);
        } else {
            panic!("Wrong error variant");
        }
    }

    #[test]
    fn test_is_client_error() {
        assert!(MenderError::invalid_request("language", "missing").is_client_error());
        assert!(MenderError::unsupported_language("cobol", vec![]).is_client_error());
        assert!(!MenderError::fix_failed("boom").is_client_error());
        assert!(!MenderError::storage("disk full").is_client_error());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(MenderError::fix_failed("boom").is_recoverable());
        assert!(MenderError::storage("disk full").is_recoverable());
        assert!(!MenderError::config("bad file").is_recoverable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            MenderError::invalid_request("code", "missing").exit_code(),
            2
        );
        assert_eq!(MenderError::fix_failed("boom").exit_code(), 3);
        assert_eq!(MenderError::config("bad").exit_code(), 7);
        assert_eq!(MenderError::storage("disk").exit_code(), 1);
    }

    #[test]
    fn test_config_with_path() {
        let path = PathBuf::from("/test/mender.toml");
        let err = MenderError::config_with_path("failed to parse", path.clone());
        if let MenderError::Config {
            message,
            path: opt_path,
        } = err
        {
            assert_eq!(message, "failed to parse");
            assert_eq!(opt_path, Some(path));
        } else {
            panic!("Wrong error variant");
        }
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: MenderError = io_err.into();
        assert!(matches!(err, MenderError::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }
}

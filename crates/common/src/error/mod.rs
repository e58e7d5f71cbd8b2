//! Shared error foundation
//!
//! [`CommonError`] holds the failure kinds more than one layer reports.
//! Module errors wrap it and implement [`ErrorClassification`], so callers
//! decide on retries and log levels without matching every variant.
//!
//! ```
//! use propmon_common::error::{CommonError, ErrorClassification, ErrorSeverity};
//!
//! let err = CommonError::validation("username", "must not be blank");
//! assert!(!err.is_retryable());
//! assert_eq!(err.severity(), ErrorSeverity::Info);
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub type CommonResult<T> = Result<T, CommonError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// A caller-supplied value was rejected before any I/O happened.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    #[error("{operation} timed out after {}ms", duration.as_millis())]
    Timeout { operation: String, duration: Duration },

    /// A remote service answered with a failure or could not be reached.
    #[error("{service} error: {message}")]
    Backend { service: String, message: String, transient: bool },
}

impl CommonError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout { operation: operation.into(), duration }
    }

    pub fn backend(service: impl Into<String>, message: impl Into<String>, transient: bool) -> Self {
        Self::Backend { service: service.into(), message: message.into(), transient }
    }
}

/// Retry and severity hints implemented by every module error.
pub trait ErrorClassification {
    /// Trying the same operation again may succeed.
    fn is_retryable(&self) -> bool;

    fn severity(&self) -> ErrorSeverity;

    /// Broken local state, not a bad input or a flaky remote.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Backend { transient, .. } => *transient,
            Self::Validation { .. } | Self::Config { .. } => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } => ErrorSeverity::Info,
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::Config { .. } | Self::Backend { .. } => ErrorSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `CommonError` classification across variants.
    ///
    /// Assertions:
    /// - Confirms only timeouts and transient backend failures are retryable.
    /// - Confirms no common error is critical on its own.
    #[test]
    fn test_classification() {
        assert!(CommonError::timeout("token refresh", Duration::from_secs(5)).is_retryable());
        assert!(CommonError::backend("identity", "connection reset", true).is_retryable());
        assert!(!CommonError::backend("identity", "invalid_grant", false).is_retryable());
        assert!(!CommonError::config("auth.realm", "must not be empty").is_retryable());
        assert!(!CommonError::validation("token", "must not be blank").is_critical());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CommonError::config("auth.realm", "must not be empty").to_string(),
            "Configuration error in 'auth.realm': must not be empty"
        );
        assert_eq!(
            CommonError::timeout("token refresh", Duration::from_millis(1500)).to_string(),
            "token refresh timed out after 1500ms"
        );
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
        assert!(ErrorSeverity::Warning > ErrorSeverity::Info);
    }
}

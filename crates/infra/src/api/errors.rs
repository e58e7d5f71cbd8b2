//! API-specific error types
//!
//! Every failure of a resource call falls into one [`ApiErrorCategory`],
//! which is what gets logged.

use std::fmt;
use std::time::Duration;

use propmon_common::storage::StorageError;
use propmon_domain::PropmonError;
use reqwest::StatusCode;
use thiserror::Error;

/// What kind of failure a resource call ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401 or 403
    Authentication,
    /// Session cleared after the fallback token was rejected
    Session,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx
    Client,
    /// Connection failures and timeouts
    Network,
    /// Body did not match the expected shape
    Decode,
    /// Configuration and local storage errors
    Config,
}

impl fmt::Display for ApiErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authentication => "authentication",
            Self::Session => "session",
            Self::RateLimit => "rate_limit",
            Self::Server => "server",
            Self::Client => "client",
            Self::Network => "network",
            Self::Decode => "decode",
            Self::Config => "config",
        })
    }
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::SessionExpired(_) => ApiErrorCategory::Session,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::NotFound(_) | Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Config(_) | Self::Storage(_) => ApiErrorCategory::Config,
        }
    }
}

/// Map a non-success status to an [`ApiError`]. 401 handling happens in the
/// pipeline before this is reached.
#[must_use]
pub fn map_status_error(status: StatusCode, url: &str, body: &str) -> ApiError {
    let snippet: String = body.chars().take(200).collect();
    let message = if snippet.is_empty() {
        format!("{url} returned HTTP {}", status.as_u16())
    } else {
        format!("{url} returned HTTP {}: {snippet}", status.as_u16())
    };

    match status.as_u16() {
        401 | 403 => ApiError::Auth(message),
        404 => ApiError::NotFound(message),
        429 => ApiError::RateLimit(message),
        500..=599 => ApiError::Server(message),
        _ => ApiError::Client(message),
    }
}

/// Transport failures reported by the HTTP client.
impl From<PropmonError> for ApiError {
    fn from(err: PropmonError) -> Self {
        match err {
            PropmonError::Config(message)
            | PropmonError::Internal(message)
            | PropmonError::Storage(message) => Self::Config(message),
            PropmonError::Decode(message) => Self::Decode(message),
            PropmonError::Auth(message) => Self::Auth(message),
            PropmonError::SessionExpired(message) => Self::SessionExpired(message),
            PropmonError::NotFound(message) => Self::NotFound(message),
            PropmonError::Upstream(message) => Self::Server(message),
            PropmonError::InvalidInput(message) => Self::Client(message),
            PropmonError::Network(message) => Self::Network(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let url = "http://api.test/kpis";
        assert!(matches!(map_status_error(StatusCode::FORBIDDEN, url, ""), ApiError::Auth(_)));
        assert!(matches!(map_status_error(StatusCode::NOT_FOUND, url, ""), ApiError::NotFound(_)));
        assert!(matches!(
            map_status_error(StatusCode::TOO_MANY_REQUESTS, url, ""),
            ApiError::RateLimit(_)
        ));
        assert!(matches!(map_status_error(StatusCode::BAD_GATEWAY, url, ""), ApiError::Server(_)));
        assert!(matches!(map_status_error(StatusCode::BAD_REQUEST, url, ""), ApiError::Client(_)));
    }

    #[test]
    fn test_status_message_truncates_body() {
        let body = "x".repeat(1000);
        let err = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, "u", &body);
        assert!(err.to_string().len() < 300);
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(ApiError::SessionExpired("x".into()).category(), ApiErrorCategory::Session);
        assert_eq!(ApiError::NotFound("x".into()).category(), ApiErrorCategory::Client);
        assert_eq!(ApiError::Timeout(Duration::from_secs(1)).category(), ApiErrorCategory::Network);
        assert_eq!(
            map_status_error(StatusCode::TOO_MANY_REQUESTS, "u", "").category(),
            ApiErrorCategory::RateLimit
        );
        assert_eq!(ApiErrorCategory::RateLimit.to_string(), "rate_limit");
    }
}

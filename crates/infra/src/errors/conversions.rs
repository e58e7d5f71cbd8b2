//! Conversions from external infrastructure errors into domain errors.

use propmon_common::auth::{AuthError, OAuthClientError};
use propmon_common::storage::StorageError;
use propmon_domain::PropmonError;
use reqwest::Error as HttpError;

use crate::api::errors::ApiError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PropmonError);

impl From<InfraError> for PropmonError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PropmonError> for InfraError {
    fn from(value: PropmonError) -> Self {
        Self(value)
    }
}

trait IntoPropmonError {
    fn into_propmon(self) -> PropmonError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PropmonError */
/* -------------------------------------------------------------------------- */

impl IntoPropmonError for HttpError {
    fn into_propmon(self) -> PropmonError {
        if self.is_timeout() {
            return PropmonError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return PropmonError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return PropmonError::Decode(self.to_string());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => PropmonError::Auth(message),
                404 => PropmonError::NotFound(message),
                400..=499 => PropmonError::InvalidInput(message),
                _ => PropmonError::Upstream(message),
            };
        }

        if self.is_builder() {
            return PropmonError::Config(self.to_string());
        }

        PropmonError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_propmon())
    }
}

/* -------------------------------------------------------------------------- */
/* Session and auth errors → PropmonError */
/* -------------------------------------------------------------------------- */

impl IntoPropmonError for StorageError {
    fn into_propmon(self) -> PropmonError {
        PropmonError::Storage(self.to_string())
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        Self(value.into_propmon())
    }
}

impl IntoPropmonError for OAuthClientError {
    fn into_propmon(self) -> PropmonError {
        if self.is_transport() {
            return PropmonError::Network(self.to_string());
        }
        match self {
            Self::ConfigError(message) => PropmonError::Config(message),
            Self::ParseError(message) => PropmonError::Decode(message),
            other => PropmonError::Auth(other.to_string()),
        }
    }
}

impl From<OAuthClientError> for InfraError {
    fn from(value: OAuthClientError) -> Self {
        Self(value.into_propmon())
    }
}

impl IntoPropmonError for AuthError {
    fn into_propmon(self) -> PropmonError {
        match self {
            AuthError::InvalidCredentials(err) => PropmonError::InvalidInput(err.to_string()),
            AuthError::Storage(err) => err.into_propmon(),
            AuthError::LoginFailed { source, .. } => match source.into_propmon() {
                PropmonError::Auth(message) => PropmonError::Auth(message),
                other => PropmonError::Auth(format!("login failed: {other}")),
            },
        }
    }
}

impl From<AuthError> for InfraError {
    fn from(value: AuthError) -> Self {
        Self(value.into_propmon())
    }
}

/* -------------------------------------------------------------------------- */
/* ApiError → PropmonError */
/* -------------------------------------------------------------------------- */

impl IntoPropmonError for ApiError {
    fn into_propmon(self) -> PropmonError {
        let message = self.to_string();
        match self {
            ApiError::Auth(_) => PropmonError::Auth(message),
            ApiError::SessionExpired(_) => PropmonError::SessionExpired(message),
            ApiError::NotFound(_) => PropmonError::NotFound(message),
            ApiError::RateLimit(_) | ApiError::Server(_) | ApiError::Client(_) => {
                PropmonError::Upstream(message)
            }
            ApiError::Network(_) | ApiError::Timeout(_) => PropmonError::Network(message),
            ApiError::Decode(_) => PropmonError::Decode(message),
            ApiError::Config(_) => PropmonError::Config(message),
            ApiError::Storage(_) => PropmonError::Storage(message),
        }
    }
}

impl From<ApiError> for InfraError {
    fn from(value: ApiError) -> Self {
        Self(value.into_propmon())
    }
}

impl From<ApiError> for PropmonError {
    fn from(value: ApiError) -> Self {
        value.into_propmon()
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

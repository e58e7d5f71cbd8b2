//! OAuth 2.0 types and structures
//!
//! Token endpoint payloads, grant descriptions and the credential input
//! accepted by the login surface.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CommonError;

/// Token endpoint success body (RFC 6749 §5.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// OAuth error response from authorization server (RFC 6749 §5.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}

/// Grant requested from the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum TokenGrant {
    /// Resource-owner password grant with the public client id
    Password { username: String, password: String },
    /// Client-credentials grant with the configured service client
    ClientCredentials,
}

impl TokenGrant {
    #[must_use]
    pub const fn grant_type(&self) -> &'static str {
        match self {
            Self::Password { .. } => "password",
            Self::ClientCredentials => "client_credentials",
        }
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::ClientCredentials => f.write_str("ClientCredentials"),
        }
    }
}

/// Login input: a username/password pair or a pre-issued token.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { username: String, password: String },
    Token(String),
}

impl Credentials {
    /// Reject blank fields before any network call.
    ///
    /// # Errors
    /// Returns [`CommonError::Validation`] naming the first blank field.
    pub fn validate(&self) -> Result<(), CommonError> {
        match self {
            Self::Password { username, password } => {
                if username.trim().is_empty() {
                    return Err(CommonError::validation("username", "must not be blank"));
                }
                if password.is_empty() {
                    return Err(CommonError::validation("password", "must not be blank"));
                }
                Ok(())
            }
            Self::Token(token) if token.trim().is_empty() => {
                Err(CommonError::validation("token", "must not be blank"))
            }
            Self::Token(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
        }
    }
}

/// Token attached to an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundToken {
    pub token: String,
    /// The token is the configured fallback token
    pub is_fallback: bool,
}

impl OutboundToken {
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

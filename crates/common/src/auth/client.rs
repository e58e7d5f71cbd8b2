//! OAuth 2.0 token endpoint client
//!
//! Issues form-encoded requests against an OpenID Connect token endpoint for
//! the password and client-credentials grants.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::traits::TokenEndpoint;
use super::types::{OAuthError, TokenGrant, TokenResponse};

/// Error type for OAuth client operations
#[derive(Debug, Error)]
pub enum OAuthClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("OAuth error: {0}")]
    OAuth(OAuthError),

    #[error("Token endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl OAuthClientError {
    /// Transport-level failure (no response from the identity provider).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestFailed(err) if err.status().is_none())
    }
}

/// Token endpoint settings.
#[derive(Clone)]
pub struct OAuthClientConfig {
    /// Full token endpoint URL
    pub token_url: String,
    /// Public client used for the password grant
    pub client_id: String,
    /// Confidential client used for the client-credentials grant
    pub service_client_id: Option<String>,
    pub service_client_secret: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("service_client_id", &self.service_client_id)
            .field("service_client_secret", &self.service_client_secret.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// OAuth 2.0 client for a single token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthClientConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a client with its own connection pool.
    ///
    /// # Errors
    /// Returns [`OAuthClientError::ConfigError`] when the HTTP client cannot
    /// be built.
    pub fn new(config: OAuthClientConfig) -> Result<Self, OAuthClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OAuthClientError::ConfigError(e.to_string()))?;
        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &OAuthClientConfig {
        &self.config
    }

    fn form_for(&self, grant: &TokenGrant) -> Result<Vec<(&'static str, String)>, OAuthClientError> {
        let mut form = vec![("grant_type", grant.grant_type().to_string())];
        match grant {
            TokenGrant::Password { username, password } => {
                form.push(("client_id", self.config.client_id.clone()));
                form.push(("username", username.clone()));
                form.push(("password", password.clone()));
            }
            TokenGrant::ClientCredentials => {
                let client_id = self.config.service_client_id.clone().ok_or_else(|| {
                    OAuthClientError::ConfigError("service client id is not configured".to_string())
                })?;
                let secret = self.config.service_client_secret.clone().ok_or_else(|| {
                    OAuthClientError::ConfigError(
                        "service client secret is not configured".to_string(),
                    )
                })?;
                form.push(("client_id", client_id));
                form.push(("client_secret", secret));
            }
        }
        Ok(form)
    }

    /// Request a token for `grant`.
    ///
    /// # Errors
    /// Returns error if the service client is not configured, the request
    /// fails, the server answers with an error, or the body cannot be parsed.
    pub async fn request_token(
        &self,
        grant: &TokenGrant,
    ) -> Result<TokenResponse, OAuthClientError> {
        let form = self.form_for(grant)?;
        debug!(grant_type = grant.grant_type(), url = %self.config.token_url, "Requesting token");

        let response = self.client.post(&self.config.token_url).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(serde_json::from_str::<OAuthError>(&body)
                .map_or(OAuthClientError::Status { status }, OAuthClientError::OAuth));
        }

        response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl TokenEndpoint for OAuthClient {
    async fn request_token(&self, grant: &TokenGrant) -> Result<TokenResponse, OAuthClientError> {
        Self::request_token(self, grant).await
    }
}

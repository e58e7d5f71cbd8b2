//! Traits for token issuance and session-expiry notification
//!
//! These seams let the auth service and request pipeline run against a
//! mock token endpoint and a recording expiry handler in tests.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::types::{TokenGrant, TokenResponse};

/// Issues access tokens.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange `grant` for a token.
    ///
    /// # Errors
    /// Returns error on transport failure, an OAuth error body, or an
    /// unparsable response.
    async fn request_token(&self, grant: &TokenGrant) -> Result<TokenResponse, OAuthClientError>;
}

/// Receives the "session expired" signal raised after a rejected fallback
/// token. The page layer responds by navigating to the login route.
pub trait SessionExpiredHandler: Send + Sync {
    fn on_session_expired(&self);
}

/// Handler that ignores the signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSessionHandler;

impl SessionExpiredHandler for NoopSessionHandler {
    fn on_session_expired(&self) {}
}

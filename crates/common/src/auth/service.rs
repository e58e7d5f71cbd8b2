//! Session-level authentication service
//!
//! Ties the token endpoint to the persisted session and applies the fallback
//! token policy:
//! - a failed login stores the fallback token when the policy is enabled, so
//!   the caller may treat the failure as a soft success
//! - outbound requests refresh an expired token through the
//!   client-credentials grant before a token is attached
//!
//! The "check expiry, refresh, read token" sequence runs under an async
//! mutex so concurrent requests observe refresh-then-attach ordering.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::client::OAuthClientError;
use super::session::SessionStore;
use super::traits::TokenEndpoint;
use super::types::{Credentials, OutboundToken, TokenGrant};
use crate::error::{CommonError, ErrorClassification, ErrorSeverity};
use crate::storage::StorageError;

/// Error type for authentication operations
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(CommonError),

    /// The token endpoint call failed. `fallback_applied` tells the caller
    /// whether the fallback token now backs the session.
    #[error("Login failed (fallback token applied: {fallback_applied}): {source}")]
    LoginFailed {
        #[source]
        source: OAuthClientError,
        fallback_applied: bool,
    },

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// True when the login failed but the fallback token was stored.
    #[must_use]
    pub const fn fallback_applied(&self) -> bool {
        matches!(self, Self::LoginFailed { fallback_applied: true, .. })
    }
}

impl ErrorClassification for AuthError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::LoginFailed { source, .. } if source.is_transport())
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidCredentials(_) => ErrorSeverity::Info,
            Self::LoginFailed { fallback_applied: true, .. } => ErrorSeverity::Warning,
            Self::LoginFailed { .. } | Self::Storage(_) => ErrorSeverity::Error,
        }
    }
}

/// Static token used when the identity provider cannot issue one.
#[derive(Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub enabled: bool,
    pub token: String,
    pub lifetime_secs: i64,
}

impl FallbackPolicy {
    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false, token: String::new(), lifetime_secs: 0 }
    }

    fn matches(&self, token: &str) -> bool {
        !self.token.is_empty() && self.token == token
    }
}

impl std::fmt::Debug for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackPolicy")
            .field("enabled", &self.enabled)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

/// Authentication service shared by the login surface and the request
/// pipeline.
pub struct AuthService {
    endpoint: Arc<dyn TokenEndpoint>,
    session: SessionStore,
    fallback: FallbackPolicy,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("session", &self.session)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    #[must_use]
    pub fn new(
        endpoint: Arc<dyn TokenEndpoint>,
        session: SessionStore,
        fallback: FallbackPolicy,
    ) -> Self {
        Self { endpoint, session, fallback, refresh_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub const fn fallback_enabled(&self) -> bool {
        self.fallback.enabled
    }

    /// Whether `token` is the configured fallback token.
    #[must_use]
    pub fn is_fallback_token(&self, token: &str) -> bool {
        self.fallback.matches(token)
    }

    /// Dispatch on the credential mode after validating it.
    ///
    /// # Errors
    /// See [`Self::login_with_password`] and [`Self::login_with_token`].
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        credentials.validate().map_err(AuthError::InvalidCredentials)?;
        match credentials {
            Credentials::Password { username, password } => {
                self.login_with_password(username, password).await
            }
            Credentials::Token(token) => self.login_with_token(token),
        }
    }

    /// Resource-owner password login.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] for blank input (no network
    /// call is made) and [`AuthError::LoginFailed`] when the endpoint rejects
    /// the request.
    pub async fn login_with_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        Credentials::Password { username: username.to_string(), password: password.to_string() }
            .validate()
            .map_err(AuthError::InvalidCredentials)?;

        let grant =
            TokenGrant::Password { username: username.to_string(), password: password.to_string() };
        self.acquire(&grant).await
    }

    /// Client-credentials login with the configured service client.
    ///
    /// # Errors
    /// Returns [`AuthError::LoginFailed`] when the endpoint rejects the
    /// request or the service client is not configured.
    pub async fn login_with_service(&self) -> Result<(), AuthError> {
        self.acquire(&TokenGrant::ClientCredentials).await
    }

    /// Store a caller-supplied token without contacting the identity
    /// provider. The token is kept for the fallback lifetime.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] for a blank token or a
    /// storage error.
    pub fn login_with_token(&self, token: &str) -> Result<(), AuthError> {
        Credentials::Token(token.to_string()).validate().map_err(AuthError::InvalidCredentials)?;
        self.session.save(token, self.fallback.lifetime_secs)?;
        info!("Session token supplied directly");
        Ok(())
    }

    async fn acquire(&self, grant: &TokenGrant) -> Result<(), AuthError> {
        match self.endpoint.request_token(grant).await {
            Ok(response) => {
                self.session.save(&response.access_token, response.expires_in)?;
                info!(
                    grant_type = grant.grant_type(),
                    expires_in = response.expires_in,
                    "Token acquired"
                );
                Ok(())
            }
            Err(source) => {
                warn!(grant_type = grant.grant_type(), error = %source, "Token request failed");
                let fallback_applied = self.apply_fallback()?;
                Err(AuthError::LoginFailed { source, fallback_applied })
            }
        }
    }

    /// Store the fallback token if the policy allows it.
    ///
    /// Returns whether the fallback token was stored.
    ///
    /// # Errors
    /// Returns error if the session cannot be written.
    pub fn apply_fallback(&self) -> Result<bool, StorageError> {
        if !self.fallback.enabled {
            return Ok(false);
        }
        self.session.save(&self.fallback.token, self.fallback.lifetime_secs)?;
        info!(lifetime_secs = self.fallback.lifetime_secs, "Fallback token applied");
        Ok(true)
    }

    /// A token is stored and it is either unexpired or the fallback token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        match self.session.read() {
            Ok(Some(token)) if !token.is_empty() => {
                !self.session.is_expired() || self.fallback.matches(&token)
            }
            Ok(_) => false,
            Err(err) => {
                warn!(error = %err, "Failed to read session token");
                false
            }
        }
    }

    /// Clear the stored session.
    ///
    /// # Errors
    /// Returns error if the session cannot be written.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.session.clear()?;
        info!("Session cleared");
        Ok(())
    }

    /// Token to attach to an outbound request without refreshing: the stored
    /// token, else the fallback token when the policy is enabled.
    ///
    /// # Errors
    /// Returns error if the session cannot be read.
    pub fn current_token(&self) -> Result<Option<OutboundToken>, StorageError> {
        let token = match self.session.read()? {
            Some(token) if !token.is_empty() => Some(token),
            _ if self.fallback.enabled => Some(self.fallback.token.clone()),
            _ => None,
        };
        Ok(token.map(|token| OutboundToken { is_fallback: self.fallback.matches(&token), token }))
    }

    /// Obtain a token through the service grant when none is stored or the
    /// stored one has expired, then return the token to attach. A failed
    /// refresh is logged and the last known token (or the fallback) is
    /// returned.
    ///
    /// # Errors
    /// Returns error if the session cannot be read.
    pub async fn prepare_outbound_token(&self) -> Result<Option<OutboundToken>, StorageError> {
        let _guard = self.refresh_lock.lock().await;

        let has_token = self.session.read()?.is_some_and(|token| !token.is_empty());
        if !has_token || self.session.is_expired() {
            debug!(has_token, "No usable session token; requesting one with service credentials");
            match self.login_with_service().await {
                Ok(()) => {}
                Err(AuthError::Storage(err)) => return Err(err),
                Err(err) => warn!(error = %err, "Token refresh failed; using last known token"),
            }
        }

        self.current_token()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::service.
    use std::time::Duration;

    use super::*;
    use crate::auth::types::TokenResponse;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::testing::mocks::MockTokenEndpoint;
    use crate::time::MockClock;

    const FALLBACK: &str = "fallback-token";

    struct Fixture {
        service: AuthService,
        endpoint: Arc<MockTokenEndpoint>,
        store: Arc<MemoryStore>,
        clock: MockClock,
    }

    fn fixture(fallback_enabled: bool) -> Fixture {
        let endpoint = Arc::new(MockTokenEndpoint::new());
        let store = Arc::new(MemoryStore::new());
        let clock = MockClock::at_millis(1_000_000);
        let session = SessionStore::new(store.clone(), Arc::new(clock.clone()), "test");
        let fallback = FallbackPolicy {
            enabled: fallback_enabled,
            token: FALLBACK.to_string(),
            lifetime_secs: 3600,
        };
        let service = AuthService::new(endpoint.clone(), session, fallback);
        Fixture { service, endpoint, store, clock }
    }

    fn token(access: &str, expires_in: i64) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            expires_in,
            token_type: "Bearer".to_string(),
            refresh_token: None,
            scope: None,
        }
    }

    /// Validates `AuthService::login_with_password` behavior for the success
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the issued token is stored.
    /// - Ensures `is_authenticated()` evaluates to true.
    #[tokio::test]
    async fn test_password_login_stores_token() {
        let f = fixture(true);
        f.endpoint.push_ok(token("user-token", 300));

        f.service.login_with_password("ana", "pw").await.unwrap();

        assert_eq!(f.service.session().read().unwrap().as_deref(), Some("user-token"));
        assert!(f.service.is_authenticated());
        assert_eq!(f.endpoint.grants()[0].grant_type(), "password");
    }

    /// Validates `AuthService::login_with_password` behavior for the endpoint
    /// failure scenario.
    ///
    /// Assertions:
    /// - Ensures the error reports `fallback_applied`.
    /// - Confirms the fallback token is stored and authenticated.
    #[tokio::test]
    async fn test_failed_login_applies_fallback() {
        let f = fixture(true);
        f.endpoint.push_err(OAuthClientError::Status { status: 503 });

        let err = f.service.login_with_password("ana", "pw").await.unwrap_err();

        assert!(err.fallback_applied());
        assert_eq!(f.service.session().read().unwrap().as_deref(), Some(FALLBACK));
        assert!(f.service.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_without_fallback_leaves_session_empty() {
        let f = fixture(false);
        f.endpoint.push_err(OAuthClientError::Status { status: 401 });

        let err = f.service.login_with_service().await.unwrap_err();

        assert!(!err.fallback_applied());
        assert!(f.store.is_empty());
        assert!(!f.service.is_authenticated());
        assert_eq!(f.service.current_token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_credentials_skip_network() {
        let f = fixture(true);
        let err = f.service.login_with_password("", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert!(f.endpoint.grants().is_empty());
        assert!(f.store.is_empty());
    }

    /// Validates `AuthService::is_authenticated` behavior for the expired
    /// fallback token scenario.
    ///
    /// Assertions:
    /// - Ensures an expired regular token is not authenticated.
    /// - Ensures an expired fallback token is still authenticated.
    #[test]
    fn test_fallback_token_ignores_expiry() {
        let f = fixture(true);
        f.service.session().save("regular", 10).unwrap();
        f.clock.advance(Duration::from_secs(11));
        assert!(!f.service.is_authenticated());

        f.service.session().save(FALLBACK, 10).unwrap();
        f.clock.advance(Duration::from_secs(11));
        assert!(f.service.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_with_token_and_logout() {
        let f = fixture(true);
        f.service.login(&Credentials::Token("raw-token".to_string())).await.unwrap();
        assert!(f.service.is_authenticated());
        assert_eq!(f.store.get("test:token").unwrap().as_deref(), Some("raw-token"));

        f.service.logout().unwrap();
        assert!(!f.service.is_authenticated());
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn test_login_with_token_stores_input_verbatim() {
        let f = fixture(true);
        f.service.login_with_token("  raw-token \n").unwrap();
        assert_eq!(f.store.get("test:token").unwrap().as_deref(), Some("  raw-token \n"));

        let err = f.service.login_with_token(" \t").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
    }

    #[test]
    fn test_current_token_defaults_to_fallback() {
        let f = fixture(true);
        let outbound = f.service.current_token().unwrap().unwrap();
        assert_eq!(outbound.token, FALLBACK);
        assert!(outbound.is_fallback);
    }

    /// Validates `AuthService::prepare_outbound_token` behavior for the
    /// empty session scenario.
    ///
    /// Assertions:
    /// - Confirms one client-credentials grant is issued for an empty store.
    /// - Confirms the service token, not the fallback, is attached.
    #[tokio::test]
    async fn test_empty_session_requests_service_token() {
        let f = fixture(true);
        f.endpoint.push_ok(token("service-token", 300));

        let outbound = f.service.prepare_outbound_token().await.unwrap().unwrap();

        assert_eq!(outbound.token, "service-token");
        assert!(!outbound.is_fallback);
        assert_eq!(f.endpoint.grants(), vec![TokenGrant::ClientCredentials]);
    }

    #[tokio::test]
    async fn test_empty_session_uses_fallback_when_grant_fails() {
        let f = fixture(true);
        f.endpoint.push_err(OAuthClientError::Status { status: 503 });

        let outbound = f.service.prepare_outbound_token().await.unwrap().unwrap();

        assert_eq!(outbound.token, FALLBACK);
        assert!(outbound.is_fallback);
        assert_eq!(f.endpoint.grants().len(), 1);

        // The stored fallback is still fresh, so no second grant.
        f.service.prepare_outbound_token().await.unwrap();
        assert_eq!(f.endpoint.grants().len(), 1);
    }

    /// Validates `AuthService::prepare_outbound_token` behavior for the
    /// expired token scenario.
    ///
    /// Assertions:
    /// - Confirms a client-credentials grant was issued before the token was
    ///   returned.
    /// - Confirms the refreshed token is attached.
    #[tokio::test]
    async fn test_expired_token_is_refreshed_first() {
        let f = fixture(true);
        f.service.session().save("stale", 1).unwrap();
        f.clock.advance(Duration::from_secs(2));
        f.endpoint.push_ok(token("fresh", 300));

        let outbound = f.service.prepare_outbound_token().await.unwrap().unwrap();

        assert_eq!(outbound.token, "fresh");
        assert!(!outbound.is_fallback);
        assert_eq!(f.endpoint.grants(), vec![TokenGrant::ClientCredentials]);
    }

    #[tokio::test]
    async fn test_failed_refresh_without_fallback_keeps_last_token() {
        let f = fixture(false);
        f.service.session().save("stale", 1).unwrap();
        f.clock.advance(Duration::from_secs(2));
        f.endpoint.push_err(OAuthClientError::Status { status: 500 });

        let outbound = f.service.prepare_outbound_token().await.unwrap().unwrap();
        assert_eq!(outbound.token, "stale");
    }

    #[tokio::test]
    async fn test_concurrent_requests_refresh_once() {
        let f = fixture(true);
        f.service.session().save("stale", 1).unwrap();
        f.clock.advance(Duration::from_secs(2));
        f.endpoint.push_ok(token("fresh", 300));

        let service = Arc::new(f.service);
        let (a, b) = tokio::join!(service.prepare_outbound_token(), service.prepare_outbound_token());

        assert_eq!(a.unwrap().unwrap().token, "fresh");
        assert_eq!(b.unwrap().unwrap().token, "fresh");
        assert_eq!(f.endpoint.grants().len(), 1);
    }
}

//! Mock implementations of common traits

#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "platform")]
pub use self::auth::{MockTokenEndpoint, RecordingSessionHandler};

#[cfg(feature = "platform")]
mod auth {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::auth::{
        OAuthClientError, SessionExpiredHandler, TokenEndpoint, TokenGrant, TokenResponse,
    };

    /// Token endpoint answering from a scripted queue.
    ///
    /// Every request is recorded. When the queue is empty the endpoint
    /// answers with HTTP 503.
    ///
    /// ```
    /// use propmon_common::auth::{TokenEndpoint, TokenGrant, TokenResponse};
    /// use propmon_common::testing::MockTokenEndpoint;
    ///
    /// # tokio_test_block(async {
    /// let endpoint = MockTokenEndpoint::new();
    /// endpoint.push_ok(TokenResponse {
    ///     access_token: "abc".into(),
    ///     expires_in: 60,
    ///     token_type: "Bearer".into(),
    ///     refresh_token: None,
    ///     scope: None,
    /// });
    /// let token = endpoint.request_token(&TokenGrant::ClientCredentials).await.unwrap();
    /// assert_eq!(token.access_token, "abc");
    /// assert!(endpoint.request_token(&TokenGrant::ClientCredentials).await.is_err());
    /// # });
    /// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
    /// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
    /// # }
    /// ```
    #[derive(Debug, Default)]
    pub struct MockTokenEndpoint {
        responses: Mutex<VecDeque<Result<TokenResponse, OAuthClientError>>>,
        grants: Mutex<Vec<TokenGrant>>,
    }

    impl MockTokenEndpoint {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a successful token response.
        pub fn push_ok(&self, response: TokenResponse) {
            self.responses.lock().push_back(Ok(response));
        }

        /// Queue a failure.
        pub fn push_err(&self, error: OAuthClientError) {
            self.responses.lock().push_back(Err(error));
        }

        /// Grants requested so far, oldest first.
        pub fn grants(&self) -> Vec<TokenGrant> {
            self.grants.lock().clone()
        }
    }

    #[async_trait]
    impl TokenEndpoint for MockTokenEndpoint {
        async fn request_token(
            &self,
            grant: &TokenGrant,
        ) -> Result<TokenResponse, OAuthClientError> {
            self.grants.lock().push(grant.clone());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or(Err(OAuthClientError::Status { status: 503 }))
        }
    }

    /// Session-expiry handler that counts notifications.
    #[derive(Debug, Default)]
    pub struct RecordingSessionHandler {
        calls: AtomicUsize,
    }

    impl RecordingSessionHandler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SessionExpiredHandler for RecordingSessionHandler {
        fn on_session_expired(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }
}

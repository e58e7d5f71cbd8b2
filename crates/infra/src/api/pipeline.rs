//! Authorized request pipeline
//!
//! Every outbound request goes through [`AuthorizedPipeline::execute`]:
//!
//! 1. An expired stored token is refreshed with the service grant first.
//! 2. `Authorization: Bearer <token>` is attached (the fallback token when
//!    nothing is stored and the fallback policy is enabled).
//! 3. A 401 on a request that did not carry the fallback token stores the
//!    fallback token and resends once.
//! 4. A 401 on the fallback token clears the session, notifies the
//!    [`SessionExpiredHandler`] and fails with [`ApiError::SessionExpired`].

use std::sync::Arc;

use propmon_common::auth::{AuthService, OutboundToken, SessionExpiredHandler};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{debug, error, warn};

use super::errors::ApiError;
use crate::http::HttpClient;

/// Request pipeline bound to the shared auth service.
#[derive(Clone)]
pub struct AuthorizedPipeline {
    http: HttpClient,
    auth: Arc<AuthService>,
    on_expired: Arc<dyn SessionExpiredHandler>,
}

impl std::fmt::Debug for AuthorizedPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedPipeline").field("http", &self.http).finish_non_exhaustive()
    }
}

impl AuthorizedPipeline {
    #[must_use]
    pub fn new(
        http: HttpClient,
        auth: Arc<AuthService>,
        on_expired: Arc<dyn SessionExpiredHandler>,
    ) -> Self {
        Self { http, auth, on_expired }
    }

    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    /// Send `request` with the current bearer token, applying the single
    /// fallback substitution on 401.
    ///
    /// The returned response may still carry a non-success status other than
    /// 401; mapping it is left to the caller.
    ///
    /// # Errors
    /// - [`ApiError::SessionExpired`] when the fallback token was rejected or
    ///   fallback is disabled
    /// - [`ApiError::Storage`] when the session cannot be read or written
    /// - transport errors from the HTTP client
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let token = self.auth.prepare_outbound_token().await?;
        let response = self.dispatch(&request, token.as_ref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let used_fallback = token.as_ref().is_some_and(|t| t.is_fallback);
        if !used_fallback && self.auth.apply_fallback()? {
            warn!("Request rejected with 401; retrying once with the fallback token");
            let fallback = self.auth.current_token()?;
            let retried = self.dispatch(&request, fallback.as_ref()).await?;
            if retried.status() != StatusCode::UNAUTHORIZED {
                return Ok(retried);
            }
        }

        Err(self.expire_session(response.url().as_str()))
    }

    async fn dispatch(
        &self,
        request: &RequestBuilder,
        token: Option<&OutboundToken>,
    ) -> Result<Response, ApiError> {
        let builder = request
            .try_clone()
            .ok_or_else(|| ApiError::Config("request body cannot be cloned".into()))?;
        let builder = match token {
            Some(token) => {
                debug!(fallback = token.is_fallback, "Attaching bearer token");
                builder.header(AUTHORIZATION, token.authorization_header())
            }
            None => builder,
        };
        Ok(self.http.send(builder).await?)
    }

    fn expire_session(&self, url: &str) -> ApiError {
        if let Err(err) = self.auth.logout() {
            error!(error = %err, "Failed to clear session after rejected token");
        }
        warn!(url, "Session expired; redirecting to login");
        self.on_expired.on_session_expired();
        ApiError::SessionExpired(format!("{url} rejected the session token"))
    }
}

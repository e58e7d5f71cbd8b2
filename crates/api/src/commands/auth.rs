//! Session commands: login, logout and status

use chrono::DateTime;
use propmon_common::auth::Credentials;
use propmon_common::{ErrorClassification, StorageError};
use propmon_domain::{PropmonError, Result};
use propmon_infra::InfraError;
use serde::Serialize;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::utils::logging::run_logged;

/// How the user authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum LoginMethod {
    Password { username: String, password: String },
    /// Pre-issued access token, stored as-is
    Token(String),
    /// Client-credentials grant with the configured service client
    Service,
}

impl std::fmt::Debug for LoginMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
            Self::Service => f.write_str("Service"),
        }
    }
}

/// Session state as shown to the user. Never carries the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    /// A token is persisted in the session store
    pub stored: bool,
    /// The stored token is the fallback token
    pub using_fallback: bool,
    pub expired: bool,
    /// RFC 3339 expiry of the stored token
    pub expires_at: Option<String>,
}

fn storage_error(err: StorageError) -> PropmonError {
    InfraError::from(err).into()
}

/// Authenticate and persist the resulting token.
///
/// A failed login that left the fallback token in place is reported as a
/// success with `using_fallback` set.
///
/// # Errors
/// Returns [`PropmonError::InvalidInput`] for blank credentials and
/// [`PropmonError::Auth`] when the identity provider rejects the login and
/// no fallback token was applied.
pub async fn login(ctx: &AppContext, method: LoginMethod) -> Result<SessionStatus> {
    run_logged("auth::login", async {
        let outcome = match method {
            LoginMethod::Password { username, password } => {
                ctx.auth.login(&Credentials::Password { username, password }).await
            }
            LoginMethod::Token(token) => ctx.auth.login(&Credentials::Token(token)).await,
            LoginMethod::Service => ctx.auth.login_with_service().await,
        };

        match outcome {
            Ok(()) => info!("Login succeeded"),
            Err(err) if err.fallback_applied() => {
                warn!(error = %err, "Login failed; continuing with the fallback token");
            }
            Err(err) => {
                warn!(severity = %err.severity(), retryable = err.is_retryable(), "Login rejected");
                return Err(PropmonError::from(InfraError::from(err)));
            }
        }

        ctx.login_redirect.take();
        session_status(ctx)
    })
    .await
}

/// Clear the stored session.
///
/// # Errors
/// Returns [`PropmonError::Storage`] if the session cannot be written.
pub async fn logout(ctx: &AppContext) -> Result<SessionStatus> {
    run_logged("auth::logout", async {
        ctx.auth.logout().map_err(storage_error)?;
        session_status(ctx)
    })
    .await
}

/// Current session state.
///
/// # Errors
/// Returns [`PropmonError::Storage`] if the session cannot be read.
pub fn session_status(ctx: &AppContext) -> Result<SessionStatus> {
    let session = ctx.auth.session();
    let stored = session.read().map_err(storage_error)?.filter(|token| !token.is_empty());
    let expires_at = session
        .expires_at_ms()
        .map_err(storage_error)?
        .and_then(DateTime::from_timestamp_millis)
        .map(|at| at.to_rfc3339());

    Ok(SessionStatus {
        authenticated: ctx.auth.is_authenticated(),
        using_fallback: stored.as_deref().is_some_and(|token| ctx.auth.is_fallback_token(token)),
        stored: stored.is_some(),
        expired: session.is_expired(),
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_method_debug_redacts_secrets() {
        let method =
            LoginMethod::Password { username: "ana".to_string(), password: "hunter2".to_string() };
        let rendered = format!("{method:?}");
        assert!(rendered.contains("ana"));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(format!("{:?}", LoginMethod::Token("abc".into())), "Token(<redacted>)");
    }
}

//! Token acquisition and session management
//!
//! ```text
//! ┌─────────────────┐
//! │   AuthService   │  login / logout / outbound token + fallback policy
//! └────────┬────────┘
//!          │
//!          ├──► TokenEndpoint (OAuthClient)   password + client-credentials grants
//!          │
//!          └──► SessionStore                  <namespace>:token / :tokenExpiry
//!                    │
//!                    └──► KeyValueStore + Clock
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: token payloads, grants, credentials
//! - **[`traits`]**: `TokenEndpoint`, `SessionExpiredHandler`
//! - **[`client`]**: reqwest-backed token endpoint client
//! - **[`session`]**: persisted token and expiry
//! - **[`service`]**: login flows and the fallback token policy

pub mod client;
pub mod service;
pub mod session;
pub mod traits;
pub mod types;

pub use client::{OAuthClient, OAuthClientConfig, OAuthClientError};
pub use service::{AuthError, AuthService, FallbackPolicy};
pub use session::SessionStore;
pub use traits::{NoopSessionHandler, SessionExpiredHandler, TokenEndpoint};
pub use types::{Credentials, OAuthError, OutboundToken, TokenGrant, TokenResponse};

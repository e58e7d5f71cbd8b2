//! Application context - dependency injection container
//!
//! Builds every service from a [`Config`] in dependency order:
//!
//! ```text
//! KeyValueStore + Clock ─► SessionStore ─┐
//!                 OAuthClient ───────────┼─► AuthService ─► ApiClient ─► DashboardApi
//!                 FallbackPolicy ────────┘                    │              │
//!                 LoginRedirect ──────────────────────────────┘              ▼
//!                                       BundledFixtures (optional) ─► DashboardService
//! ```
//!
//! Nothing is global: each command receives the context it runs against.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use propmon_common::auth::{
    AuthService, FallbackPolicy, OAuthClient, OAuthClientConfig, SessionExpiredHandler,
    SessionStore,
};
use propmon_common::{Clock, FileStore, KeyValueStore, MemoryStore, SystemClock};
use propmon_core::{DashboardService, DashboardSource, HistoryExplorer};
use propmon_domain::constants::LOGIN_ROUTE;
use propmon_domain::{Config, PropmonError, Result};
use propmon_infra::{config, ApiClient, ApiClientConfig, BundledFixtures, DashboardApi, InfraError};
use tracing::{debug, info, warn};

/* -------------------------------------------------------------------------- */
/* Session expiry */
/* -------------------------------------------------------------------------- */

/// Records the request to navigate to the login route after the session was
/// cleared by the request pipeline.
#[derive(Debug, Default)]
pub struct LoginRedirect {
    requested: AtomicBool,
}

impl LoginRedirect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn route(&self) -> &'static str {
        LOGIN_ROUTE
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Consume the pending redirect, if any.
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

impl SessionExpiredHandler for LoginRedirect {
    fn on_session_expired(&self) {
        warn!(route = LOGIN_ROUTE, "Session expired; login required");
        self.requested.store(true, Ordering::SeqCst);
    }
}

/* -------------------------------------------------------------------------- */
/* Context */
/* -------------------------------------------------------------------------- */

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub auth: Arc<AuthService>,
    pub api_client: Arc<ApiClient>,
    pub dashboard: Arc<DashboardService>,
    pub login_redirect: Arc<LoginRedirect>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("api_base_url", &self.config.api.base_url)
            .field("auth", &self.auth)
            .field("fixture_fallback", &self.dashboard.has_fallback())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Load configuration from files and the environment, then build the
    /// context.
    ///
    /// # Errors
    /// Returns error if configuration loading or any service fails to
    /// initialize.
    pub fn new() -> Result<Self> {
        Self::new_with_config(config::load()?)
    }

    /// Build the context from an already loaded configuration.
    ///
    /// # Errors
    /// See [`AppContext::with_clock`].
    pub fn new_with_config(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build the context with an explicit clock for session expiry.
    ///
    /// # Errors
    /// Returns error if:
    /// - The session file cannot be opened
    /// - The token endpoint or API HTTP client cannot be built
    /// - The bundled fixtures fail to parse
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        info!(api = %config.api.base_url, realm = %config.auth.realm, "Initializing AppContext");

        let store = open_store(&config)?;
        let session = SessionStore::new(store, clock, &config.storage.namespace);

        let timeout = Duration::from_secs(config.api.timeout_secs);
        let oauth = OAuthClient::new(OAuthClientConfig {
            token_url: config.auth.token_url(),
            client_id: config.auth.client_id.clone(),
            service_client_id: config.auth.service_client_id.clone(),
            service_client_secret: config.auth.service_client_secret.clone(),
            timeout,
        })
        .map_err(InfraError::from)?;

        let fallback = FallbackPolicy {
            enabled: config.auth.fallback_enabled,
            token: config.auth.fallback_token.clone(),
            lifetime_secs: config.auth.fallback_lifetime_secs,
        };
        let auth = Arc::new(AuthService::new(Arc::new(oauth), session, fallback));

        let login_redirect = Arc::new(LoginRedirect::new());
        let api_client = Arc::new(
            ApiClient::new(
                ApiClientConfig::from(&config.api),
                Arc::clone(&auth),
                Arc::clone(&login_redirect) as Arc<dyn SessionExpiredHandler>,
            )
            .map_err(InfraError::from)?,
        );

        let mut dashboard = DashboardService::new(Arc::new(DashboardApi::new(Arc::clone(&api_client))));
        if config.api.fixture_fallback {
            dashboard = dashboard.with_fallback(Arc::new(BundledFixtures::load()?));
            debug!("Bundled fixtures registered as dashboard fallback");
        }

        info!(
            fallback_token = config.auth.fallback_enabled,
            fixture_fallback = config.api.fixture_fallback,
            "AppContext initialized"
        );

        Ok(Self { config, auth, api_client, dashboard: Arc::new(dashboard), login_redirect })
    }

    /// A fresh history explorer over the dashboard service, using the
    /// configured debounce window and default page size.
    ///
    /// # Errors
    /// Returns [`PropmonError::InvalidInput`] when the configured page size
    /// is not one of the offered sizes.
    pub fn history_explorer(&self) -> Result<HistoryExplorer> {
        HistoryExplorer::with_settings(
            Arc::clone(&self.dashboard) as Arc<dyn DashboardSource>,
            Duration::from_millis(self.config.api.debounce_ms),
            self.config.api.default_page_size,
        )
    }
}

fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    match config.storage.session_file.as_deref() {
        Some(path) => {
            let store = FileStore::open(path).map_err(|e| {
                PropmonError::Storage(format!("Failed to open session file {path}: {e}"))
            })?;
            debug!(path, "Session persisted to file");
            Ok(Arc::new(store))
        }
        None => {
            debug!("Session kept in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

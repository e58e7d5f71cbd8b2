//! JSON client for the monitoring resource API
//!
//! Thin layer over [`AuthorizedPipeline`]: builds the URL, enforces the
//! request timeout, maps non-success statuses and decodes the body.

use std::sync::Arc;
use std::time::Duration;

use propmon_common::auth::{AuthService, SessionExpiredHandler};
use propmon_domain::ApiConfig;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::errors::{map_status_error, ApiError};
use super::pipeline::AuthorizedPipeline;
use crate::http::HttpClient;

/// Configuration for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the API (e.g., "http://localhost:3001/api")
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Resource API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    pipeline: AuthorizedPipeline,
    config: ApiClientConfig,
}

impl ApiClient {
    /// # Errors
    /// Returns [`ApiError::Config`] if the HTTP client cannot be built.
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<AuthService>,
        on_expired: Arc<dyn SessionExpiredHandler>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self { pipeline: AuthorizedPipeline::new(http, auth, on_expired), config })
    }

    #[must_use]
    pub const fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn pipeline(&self) -> &AuthorizedPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Execute a GET request and decode the JSON body.
    ///
    /// # Errors
    /// Returns error if the request fails, the status is not a success or
    /// the body cannot be decoded into `T`.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let result = self.fetch(path, query).await;
        if let Err(err) = &result {
            warn!(path = %path, category = %err.category(), error = %err, "GET request failed");
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, params = query.len(), "GET request");

        let request = self.pipeline.http().request(Method::GET, &url).query(query);
        let response =
            match tokio::time::timeout(self.config.timeout, self.pipeline.execute(request)).await {
                Ok(result) => result?,
                Err(_) => return Err(ApiError::Timeout(self.config.timeout)),
            };

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, &url, &body));
        }

        let result = serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("{path}: {e}")))?;

        info!(path = %path, "GET request successful");
        Ok(result)
    }
}

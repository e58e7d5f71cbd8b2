use std::time::Duration;

use propmon_domain::PropmonError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-over-HTTP client for the monitoring API.
///
/// Sends every request once with `Accept: application/json`; recovery from
/// a rejected token is the authorized pipeline's job.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// # Errors
    /// Returns [`PropmonError::Config`] if the TLS backend cannot be set up.
    pub fn new() -> Result<Self, PropmonError> {
        Self::builder().build()
    }

    /// Request builder bound to the shared connection pool.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder` and return the response whatever its status; the
    /// caller classifies non-success statuses.
    ///
    /// # Errors
    /// Returns the mapped transport error when no response arrives.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, PropmonError> {
        let request = builder.build().map_err(|err| PropmonError::from(InfraError::from(err)))?;
        debug!(method = %request.method(), url = %request.url(), "HTTP request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| PropmonError::from(InfraError::from(err)))?;
        debug!(status = response.status().as_u16(), "HTTP response");
        Ok(response)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("propmon/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientBuilder {
    /// Whole-request timeout, connect through body.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// # Errors
    /// Returns [`PropmonError::Config`] if the reqwest client cannot be built.
    pub fn build(self) -> Result<HttpClient, PropmonError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|err| PropmonError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

//! Monitoring API client
//!
//! # Architecture
//!
//! - [`HttpClient`](crate::http::HttpClient) for transport
//! - [`AuthorizedPipeline`] attaches the bearer token and owns the 401 policy
//! - [`ApiClient`] builds URLs, maps statuses and decodes JSON
//! - [`DashboardApi`] implements the `DashboardSource` port per endpoint

pub mod client;
pub mod dashboard;
pub mod errors;
pub mod pipeline;

pub use client::{ApiClient, ApiClientConfig};
pub use dashboard::DashboardApi;
pub use errors::{map_status_error, ApiError, ApiErrorCategory};
pub use pipeline::AuthorizedPipeline;

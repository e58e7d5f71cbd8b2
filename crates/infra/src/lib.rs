//! # Propmon Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The reqwest HTTP client
//! - The authorized request pipeline (bearer token, fallback retry on 401)
//! - Monitoring API bindings implementing `DashboardSource`
//! - The bundled fixture dataset used when the API is unavailable
//! - Configuration loading (defaults, file, environment)
//!
//! ## Architecture
//! - Implements traits defined in `propmon-core`
//! - Depends on `propmon-common`, `propmon-domain` and `propmon-core`
//! - Contains all "impure" code (network and file I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod fixtures;
pub mod http;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientConfig, ApiError, AuthorizedPipeline, DashboardApi};
pub use errors::InfraError;
pub use fixtures::BundledFixtures;
pub use http::{HttpClient, HttpClientBuilder};

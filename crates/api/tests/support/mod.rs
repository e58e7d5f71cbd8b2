//! Shared fixtures for app integration tests: a mock identity provider and
//! resource API on one wiremock server, plus a temp-dir session file.

#![allow(dead_code)]

use propmon_domain::Config;
use propmon_lib::AppContext;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REALM: &str = "test";
pub const TOKEN_PATH: &str = "/auth/realms/test/protocol/openid-connect/token";
pub const LIVE_TOKEN: &str = "live-token";

/// Server, context and the directory holding the session file.
pub struct TestEnv {
    pub server: MockServer,
    pub ctx: AppContext,
    pub dir: TempDir,
}

/// Configuration pointing every endpoint at `server_uri`.
pub fn test_config(server_uri: &str, dir: &TempDir, fixture_fallback: bool) -> Config {
    let mut config = Config::default();
    config.auth.auth_api_url = server_uri.to_string();
    config.auth.realm = REALM.to_string();
    config.auth.service_client_id = Some("svc".to_string());
    config.auth.service_client_secret = Some("svc-secret".to_string());
    config.api.base_url = format!("{server_uri}/api");
    config.api.timeout_secs = 5;
    config.api.fixture_fallback = fixture_fallback;
    config.storage.session_file =
        Some(dir.path().join("session.json").to_string_lossy().into_owned());
    config
}

pub async fn setup(fixture_fallback: bool) -> TestEnv {
    setup_with(|_| {}, fixture_fallback).await
}

/// Like [`setup`] with a hook to adjust the configuration first.
pub async fn setup_with<F>(adjust: F, fixture_fallback: bool) -> TestEnv
where
    F: FnOnce(&mut Config),
{
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut config = test_config(&server.uri(), &dir, fixture_fallback);
    adjust(&mut config);
    let ctx = AppContext::new_with_config(config).expect("context");
    TestEnv { server, ctx, dir }
}

/// Token endpoint that accepts the password grant.
pub async fn mount_password_grant(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": LIVE_TOKEN,
            "expires_in": 300,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

/// Token endpoint that accepts the client-credentials grant of the service
/// client.
pub async fn mount_service_grant(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "expires_in": 300,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

/// Token endpoint that rejects every grant.
pub async fn mount_rejecting_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid user credentials"
        })))
        .mount(server)
        .await;
}

/// Number of requests the server saw for `request_path`.
pub async fn requests_to(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}

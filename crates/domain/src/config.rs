//! Configuration management
//!
//! Every field has a default so partial files and environment overrides can
//! be layered on top of each other.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_API_URL, DEFAULT_AUTH_API_URL, DEFAULT_AUTH_REALM,
    DEFAULT_CLIENT_ID, DEFAULT_FALLBACK_LIFETIME_SECS, DEFAULT_FALLBACK_TOKEN, DEFAULT_PAGE_SIZE,
    DEFAULT_STORAGE_NAMESPACE, HISTORY_DEBOUNCE_MS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth: AuthConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

/// Identity provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL of the identity provider (realm path is appended)
    pub auth_api_url: String,
    pub realm: String,
    /// Public client used for the password grant
    pub client_id: String,
    /// Confidential client used for the client-credentials grant
    pub service_client_id: Option<String>,
    #[serde(skip_serializing)]
    pub service_client_secret: Option<String>,
    #[serde(skip_serializing)]
    pub fallback_token: String,
    /// When disabled, login failures leave the session empty and a 401 is
    /// never retried with the fallback token.
    pub fallback_enabled: bool,
    pub fallback_lifetime_secs: i64,
}

impl AuthConfig {
    /// OpenID Connect token endpoint for the configured realm.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!(
            "{}/auth/realms/{}/protocol/openid-connect/token",
            self.auth_api_url.trim_end_matches('/'),
            self.realm
        )
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_api_url: DEFAULT_AUTH_API_URL.to_string(),
            realm: DEFAULT_AUTH_REALM.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            service_client_id: None,
            service_client_secret: None,
            fallback_token: DEFAULT_FALLBACK_TOKEN.to_string(),
            fallback_enabled: true,
            fallback_lifetime_secs: DEFAULT_FALLBACK_LIFETIME_SECS,
        }
    }
}

/// Resource API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Serve bundled fixtures when a read-only view cannot be fetched
    pub fixture_fallback: bool,
    pub debounce_ms: u64,
    pub default_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            fixture_fallback: true,
            debounce_ms: HISTORY_DEBOUNCE_MS,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Prefix for persisted keys (`<namespace>:token`)
    pub namespace: String,
    /// JSON file backing the session; `None` keeps the session in memory
    pub session_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
            session_file: Some("propmon-session.json".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_url_includes_realm() {
        let config = AuthConfig {
            auth_api_url: "https://sso.example.test/".to_string(),
            realm: "corp".to_string(),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.token_url(),
            "https://sso.example.test/auth/realms/corp/protocol/openid-connect/token"
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api": {"base_url": "http://api.test"}}"#).unwrap();
        assert_eq!(config.api.base_url, "http://api.test");
        assert_eq!(config.api.timeout_secs, DEFAULT_API_TIMEOUT_SECS);
        assert_eq!(config.auth.realm, DEFAULT_AUTH_REALM);
        assert!(config.auth.fallback_enabled);
    }

    #[test]
    fn secrets_are_not_serialized() {
        let mut config = Config::default();
        config.auth.service_client_secret = Some("s3cret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("fallback_token"));
    }
}

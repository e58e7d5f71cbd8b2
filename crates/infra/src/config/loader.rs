//! Configuration loader
//!
//! Builds the application configuration in three layers:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. An optional config file (JSON or TOML, detected by extension)
//! 3. `PROPMON_*` environment variables
//!
//! ## Environment Variables
//! - `PROPMON_CONFIG`: explicit config file path
//! - `PROPMON_AUTH_API_URL`, `PROPMON_AUTH_REALM`, `PROPMON_CLIENT_ID`
//! - `PROPMON_SERVICE_CLIENT_ID`, `PROPMON_SERVICE_CLIENT_SECRET`
//! - `PROPMON_FALLBACK_TOKEN`, `PROPMON_FALLBACK_ENABLED`
//! - `PROPMON_API_URL`, `PROPMON_API_TIMEOUT_SECS`, `PROPMON_FIXTURE_FALLBACK`
//! - `PROPMON_SESSION_FILE`, `PROPMON_STORAGE_NAMESPACE`
//!
//! ## File Locations
//! Without an explicit path the loader probes, in order, `propmon.toml`,
//! `propmon.json`, `config.toml` and `config.json` in the working directory,
//! its parent and grandparent, then next to the executable.

use std::path::{Path, PathBuf};

use propmon_domain::constants::PAGE_SIZE_OPTIONS;
use propmon_domain::{Config, PropmonError, Result};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] = ["propmon.toml", "propmon.json", "config.toml", "config.json"];

/// Load configuration from defaults, the first config file found and the
/// process environment.
///
/// # Errors
/// Returns `PropmonError::Config` if:
/// - `PROPMON_CONFIG` names a missing file
/// - The file format is invalid
/// - An environment override has an invalid value
pub fn load() -> Result<Config> {
    let explicit = std::env::var("PROPMON_CONFIG").ok().map(PathBuf::from);
    load_with(explicit, |key| std::env::var(key).ok())
}

/// Layered load with an injectable environment lookup.
///
/// # Errors
/// See [`load`].
pub fn load_with<F>(path: Option<PathBuf>, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_from_file(Some(path))?,
        None => match probe_config_paths() {
            Some(found) => load_from_file(Some(found))?,
            None => {
                tracing::debug!("No config file found; using defaults");
                Config::default()
            }
        },
    };
    apply_env_overrides(&mut config, lookup)?;
    validate(&config)?;
    Ok(config)
}

/// Defaults plus `PROPMON_*` environment overrides, ignoring config files.
///
/// # Errors
/// Returns `PropmonError::Config` if an override has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `PropmonError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PropmonError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PropmonError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PropmonError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content; format by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PropmonError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PropmonError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(PropmonError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the standard locations.
#[must_use]
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Apply `PROPMON_*` overrides read through `lookup`.
///
/// # Errors
/// Returns `PropmonError::Config` naming the variable with an invalid value.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(value) = get("PROPMON_AUTH_API_URL") {
        config.auth.auth_api_url = value;
    }
    if let Some(value) = get("PROPMON_AUTH_REALM") {
        config.auth.realm = value;
    }
    if let Some(value) = get("PROPMON_CLIENT_ID") {
        config.auth.client_id = value;
    }
    if let Some(value) = get("PROPMON_SERVICE_CLIENT_ID") {
        config.auth.service_client_id = Some(value);
    }
    if let Some(value) = get("PROPMON_SERVICE_CLIENT_SECRET") {
        config.auth.service_client_secret = Some(value);
    }
    if let Some(value) = get("PROPMON_FALLBACK_TOKEN") {
        config.auth.fallback_token = value;
    }
    if let Some(value) = get("PROPMON_FALLBACK_ENABLED") {
        config.auth.fallback_enabled = parse_bool("PROPMON_FALLBACK_ENABLED", &value)?;
    }
    if let Some(value) = get("PROPMON_API_URL") {
        config.api.base_url = value;
    }
    if let Some(value) = get("PROPMON_API_TIMEOUT_SECS") {
        config.api.timeout_secs = value.parse().map_err(|e| {
            PropmonError::Config(format!("Invalid PROPMON_API_TIMEOUT_SECS '{value}': {e}"))
        })?;
    }
    if let Some(value) = get("PROPMON_FIXTURE_FALLBACK") {
        config.api.fixture_fallback = parse_bool("PROPMON_FIXTURE_FALLBACK", &value)?;
    }
    if let Some(value) = get("PROPMON_SESSION_FILE") {
        config.storage.session_file = match value.to_ascii_lowercase().as_str() {
            "none" | "memory" => None,
            _ => Some(value),
        };
    }
    if let Some(value) = get("PROPMON_STORAGE_NAMESPACE") {
        config.storage.namespace = value;
    }
    Ok(())
}

/// Reject settings no service could start with.
///
/// # Errors
/// Returns `PropmonError::Config` if:
/// - A base URL is not an absolute `http`/`https` URL
/// - The API timeout is zero
/// - The default page size is not one of the offered sizes
/// - The storage namespace is blank
pub fn validate(config: &Config) -> Result<()> {
    check_base_url("auth.auth_api_url", &config.auth.auth_api_url)?;
    check_base_url("api.base_url", &config.api.base_url)?;

    if config.api.timeout_secs == 0 {
        return Err(PropmonError::Config("api.timeout_secs must be greater than zero".into()));
    }
    if !PAGE_SIZE_OPTIONS.contains(&config.api.default_page_size) {
        return Err(PropmonError::Config(format!(
            "api.default_page_size {} is not one of {PAGE_SIZE_OPTIONS:?}",
            config.api.default_page_size
        )));
    }
    if config.storage.namespace.trim().is_empty() {
        return Err(PropmonError::Config("storage.namespace must not be blank".into()));
    }
    Ok(())
}

fn check_base_url(field: &str, value: &str) -> Result<()> {
    let parsed = Url::parse(value)
        .map_err(|e| PropmonError::Config(format!("Invalid {field} '{value}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(PropmonError::Config(format!(
            "Invalid {field} '{value}': unsupported scheme {scheme}"
        ))),
    }
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(PropmonError::Config(format!("Invalid boolean for {key}: '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(validate(&Config::default()).is_ok());

        let mut config = Config::default();
        config.api.base_url = "localhost:3001/api".to_string();
        assert!(matches!(validate(&config), Err(PropmonError::Config(_))));

        let mut config = Config::default();
        config.auth.auth_api_url = "ftp://sso.example.test".to_string();
        assert!(matches!(validate(&config), Err(PropmonError::Config(m)) if m.contains("scheme")));

        let mut config = Config::default();
        config.api.default_page_size = 7;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bool_parsing() {
        for truthy in ["1", "true", "YES", "On"] {
            assert!(parse_bool("K", truthy).unwrap());
        }
        for falsy in ["0", "false", "no", "OFF"] {
            assert!(!parse_bool("K", falsy).unwrap());
        }
        assert!(matches!(parse_bool("K", "maybe"), Err(PropmonError::Config(_))));
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PROPMON_API_URL", "http://api.test"),
                ("PROPMON_FALLBACK_ENABLED", "false"),
                ("PROPMON_SERVICE_CLIENT_SECRET", "s3cret"),
                ("PROPMON_API_TIMEOUT_SECS", "5"),
                ("PROPMON_SESSION_FILE", "memory"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://api.test");
        assert!(!config.auth.fallback_enabled);
        assert_eq!(config.auth.service_client_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.storage.session_file, None);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env(&[("PROPMON_AUTH_REALM", "  ")])).unwrap();
        assert_eq!(config.auth.realm, Config::default().auth.realm);
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let mut config = Config::default();
        let result =
            apply_env_overrides(&mut config, env(&[("PROPMON_API_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(PropmonError::Config(msg)) if msg.contains("TIMEOUT")));
    }

    #[test]
    fn test_parse_config_rejects_unknown_extension() {
        let result = parse_config("", Path::new("config.yaml"));
        assert!(matches!(result, Err(PropmonError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = load_from_file(Some(PathBuf::from("/definitely/not/here/propmon.toml")));
        assert!(matches!(result, Err(PropmonError::Config(msg)) if msg.contains("not found")));
    }
}

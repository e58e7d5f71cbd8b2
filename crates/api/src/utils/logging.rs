//! Logging setup and structured command logging helpers

use std::future::Future;
use std::time::{Duration, Instant};

use propmon_domain::{PropmonError, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Subscriber output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Logs go to
/// stderr so command output on stdout stays machine-readable.
///
/// # Errors
/// Returns error if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_target(false).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&PropmonError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            error = %err,
            "command_execution_failure"
        ),
    }
}

/// Convert a `PropmonError` into a stable label suitable for logging.
#[inline]
#[must_use]
pub const fn error_label(error: &PropmonError) -> &'static str {
    match error {
        PropmonError::Config(_) => "config",
        PropmonError::Network(_) => "network",
        PropmonError::Auth(_) => "auth",
        PropmonError::SessionExpired(_) => "session_expired",
        PropmonError::NotFound(_) => "not_found",
        PropmonError::InvalidInput(_) => "invalid_input",
        PropmonError::Decode(_) => "decode",
        PropmonError::Storage(_) => "storage",
        PropmonError::Upstream(_) => "upstream",
        PropmonError::Internal(_) => "internal",
    }
}

/// Run a command future and log how it went.
///
/// # Errors
/// Returns the command's own error unchanged.
pub async fn run_logged<T, F>(command: &'static str, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = future.await;
    log_command_execution(command, start.elapsed(), result.as_ref().err());
    result
}

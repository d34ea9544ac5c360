//! Logging initialization.
//!
//! The picker owns the terminal, so logs never go to stdout or stderr. They are only
//! written when a log file is configured (`--log-file` or `UNFORGET_LOG_FILE`);
//! otherwise no subscriber is installed and every `tracing` call is a no-op.
//!
//! # Configuration
//!
//! The log level can be controlled via the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug` - Show debug and higher level logs
//! - `RUST_LOG=info` - Show info and higher level logs (default)
//! - `RUST_LOG=warn` - Show warnings and errors only

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Append logs to `path` through a non-blocking writer.
///
/// Returns `None` when logging is disabled. The guard must be held until the last
/// event worth keeping has been emitted; dropping it flushes the writer.
pub fn init_logging(path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    // Default to "info" level if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_path() {
        assert!(init_logging(None).unwrap().is_none());
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let err = init_logging(Some(Path::new("/nonexistent/dir/unforget.log"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/unforget.log"));
    }
}

//! Logging Infrastructure
//!
//! Structured logging via `tracing`. Output goes to stdout, or to a daily
//! rolling file when a log directory is configured.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::core::Config;

/// Initialize the logger at `info`
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger from engine configuration
pub fn init_from_config(config: &Config) {
    init_logger_with_file(
        Some(&config.log_level),
        config.environment == "production",
        config.log_dir.as_deref(),
    );
}

/// Initialize the logger with optional JSON format and file output.
///
/// `RUST_LOG` overrides `log_level` when set. Calling this more than once
/// keeps the first subscriber.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_writer = log_dir
        .map(Path::new)
        .filter(|p| p.exists())
        .and_then(|p| p.to_str())
        .map(|dir| tracing_appender::rolling::daily(dir, "loyalty-engine"));

    let result = match (file_writer, json) {
        (Some(writer), true) => builder.json().with_writer(writer).try_init(),
        (Some(writer), false) => builder.with_ansi(false).with_writer(writer).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}

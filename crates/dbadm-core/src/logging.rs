//! Logging setup for dbadm binaries
//!
//! Library crates only emit `tracing` events; a binary calls [`init`] once to
//! install a subscriber. Two layers are available:
//! - a human-readable console layer on stderr
//! - a JSON layer written to a daily rolling file
//!
//! `RUST_LOG` overrides the configured filter.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{DbadmError, LogSettings, Result};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for JSON log files
    pub log_dir: PathBuf,

    /// Write JSON logs to `log_dir`
    pub enable_json_logs: bool,

    /// Write human-readable logs to stderr
    pub enable_console_logs: bool,

    /// Include file/line information
    pub include_location: bool,

    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl LoggingConfig {
    /// Verbose console output plus JSON files
    pub fn development() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: true,
            enable_console_logs: true,
            include_location: true,
            default_filter: "debug".to_string(),
        }
    }

    /// JSON files only, quiet filter
    pub fn production() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: true,
            enable_console_logs: false,
            include_location: false,
            default_filter: "warn,dbadm_objects=info,dbadm_monitor=info".to_string(),
        }
    }

    /// Console only, used by the command line tool
    pub fn console() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: false,
            enable_console_logs: true,
            include_location: false,
            default_filter: "warn".to_string(),
        }
    }

    /// Apply the `[logging]` section of the config file
    pub fn with_settings(mut self, settings: &LogSettings) -> Self {
        self.default_filter = settings.default_filter.clone();
        self.enable_json_logs = settings.json_logs;
        self
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the JSON writer on drop and must be held for the
/// lifetime of the program. Fails if a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers = Vec::new();
    let mut guard = None;

    if config.enable_console_logs {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .with_filter(env_filter.clone())
            .boxed();
        layers.push(console_layer);
    }

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "dbadm.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .json()
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| DbadmError::Other(format!("Failed to install log subscriber: {e}")))?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        console_enabled = config.enable_console_logs,
        "logging initialized"
    );

    Ok(guard)
}

/// Default directory for JSON log files
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dbadm")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_preset_has_no_files() {
        let config = LoggingConfig::console();
        assert!(config.enable_console_logs);
        assert!(!config.enable_json_logs);
    }

    #[test]
    fn test_production_preset() {
        let config = LoggingConfig::production();
        assert!(!config.enable_console_logs);
        assert!(config.enable_json_logs);
        assert!(!config.include_location);
    }

    #[test]
    fn test_settings_override_filter() {
        let settings = LogSettings {
            default_filter: "trace".to_string(),
            json_logs: true,
        };
        let config = LoggingConfig::console().with_settings(&settings);
        assert_eq!(config.default_filter, "trace");
        assert!(config.enable_json_logs);
        assert!(config.enable_console_logs);
    }

    #[test]
    fn test_log_directory_ends_with_logs() {
        assert!(log_directory().ends_with("dbadm/logs"));
    }
}

//! Configuration file support
//!
//! Settings are read from `config.toml` in the platform config directory
//! (`~/.config/dbadm/config.toml` on Linux). A missing file yields defaults.
//!
//! ```toml
//! [triggers]
//! enforce_timing_combinations = true
//! require_target_class = true
//! canonical_priority = true
//!
//! [logging]
//! default_filter = "info"
//! json_logs = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{DbadmError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbadmConfig {
    pub triggers: TriggerSettings,
    pub logging: LogSettings,
}

/// How strictly trigger definitions are checked before DDL is produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    /// Reject condition/action time pairs outside the three legal orderings
    pub enforce_timing_combinations: bool,
    /// Require a target class for insert, update and delete events
    pub require_target_class: bool,
    /// Report priorities that could not be canonicalized
    pub canonical_priority: bool,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            enforce_timing_combinations: true,
            require_target_class: true,
            canonical_priority: true,
        }
    }
}

/// Logging settings; `RUST_LOG` still takes precedence over `default_filter`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub default_filter: String,
    pub json_logs: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json_logs: false,
        }
    }
}

impl DbadmConfig {
    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path; the file must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Location of the default config file
    pub fn config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("dbadm").join("config.toml"))
            .ok_or_else(|| {
                DbadmError::Configuration("Could not determine config directory".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_strict() {
        let config = DbadmConfig::default();
        assert!(config.triggers.enforce_timing_combinations);
        assert!(config.triggers.require_target_class);
        assert!(config.triggers.canonical_priority);
        assert_eq!(config.logging.default_filter, "info");
        assert!(!config.logging.json_logs);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = DbadmConfig::from_toml_str("").unwrap();
        assert_eq!(config, DbadmConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = DbadmConfig::from_toml_str(
            "[triggers]\nenforce_timing_combinations = false\n",
        )
        .unwrap();
        assert!(!config.triggers.enforce_timing_combinations);
        assert!(config.triggers.require_target_class);
        assert_eq!(config.logging, LogSettings::default());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let err = DbadmConfig::from_toml_str("[triggers\n").unwrap_err();
        assert!(matches!(err, DbadmError::TomlParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\ndefault_filter = \"debug\"\njson_logs = true").unwrap();

        let config = DbadmConfig::load_from(file.path()).unwrap();
        assert_eq!(config.logging.default_filter, "debug");
        assert!(config.logging.json_logs);
        assert_eq!(config.triggers, TriggerSettings::default());
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DbadmConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, DbadmError::Io(_)));
    }
}

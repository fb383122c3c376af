//! Error types for dbadm

use thiserror::Error;

/// Core error type for dbadm operations
#[derive(Error, Debug)]
pub enum DbadmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for dbadm operations
pub type Result<T> = std::result::Result<T, DbadmError>;

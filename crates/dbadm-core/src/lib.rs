//! dbadm Core - shared plumbing for the dbadm crates
//!
//! This crate provides the pieces every other dbadm crate depends on:
//!
//! - `DbadmError` / `Result` - the common error type
//! - `DbadmConfig` - settings loaded from `config.toml`
//! - `logging` - tracing subscriber setup for binaries

pub mod config;
mod error;
pub mod logging;

pub use config::{DbadmConfig, LogSettings, TriggerSettings};
pub use error::*;

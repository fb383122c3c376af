use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use dbadm_core::logging::{self, LoggingConfig};
use dbadm_core::DbadmConfig;
use dbadm_objects::{TriggerDdl, TriggerPolicy, TriggerValidator};

mod commands;

/// dbadm - trigger definition and broker status tooling
#[derive(Parser)]
#[command(name = "dbadm")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the config file (default: <config dir>/dbadm/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print trigger definitions in canonical form, sorted by name
    Normalize {
        /// JSON array of trigger definitions (stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Report problems in trigger definitions
    Validate {
        /// JSON array of trigger definitions (stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Skip the optional checks regardless of config
        #[arg(long)]
        lenient: bool,
    },

    /// Print CREATE TRIGGER statements
    Ddl {
        /// JSON array of trigger definitions (stdin when omitted or "-")
        input: Option<PathBuf>,
    },

    /// Summarize a broker status reply
    Brokers {
        /// Broker status tree as JSON (stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Show a single broker
        #[arg(long)]
        broker: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DbadmConfig::load_from(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => DbadmConfig::load().context("failed to load config")?,
    };

    let logging_config = LoggingConfig {
        enable_json_logs: false,
        ..LoggingConfig::console().with_settings(&config.logging)
    };
    let _guard = logging::init(&logging_config).context("failed to initialize logging")?;

    let policy = TriggerPolicy::from(&config.triggers);

    match cli.command {
        Commands::Normalize { input, json } => {
            let triggers = commands::load_definitions(input.as_deref())?;
            let output = if json {
                commands::render_json(&triggers)?
            } else {
                commands::render_table(&triggers)
            };
            println!("{output}");
        }
        Commands::Validate { input, lenient } => {
            let triggers = commands::load_definitions(input.as_deref())?;
            let policy = if lenient { TriggerPolicy::lenient() } else { policy };
            let findings = commands::validate_definitions(&TriggerValidator::new(policy), &triggers);
            if findings.is_empty() {
                println!("{} trigger(s) valid", triggers.len());
            } else {
                print!("{}", commands::render_findings(&findings));
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Ddl { input } => {
            let triggers = commands::load_definitions(input.as_deref())?;
            println!("{}", commands::render_ddl(&TriggerDdl::new(policy), &triggers)?);
        }
        Commands::Brokers { input, broker } => {
            let status = commands::load_broker_status(input.as_deref())?;
            println!("{}", commands::render_broker_summary(&status, broker.as_deref())?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

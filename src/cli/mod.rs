//! CLI module for dingrelay
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration loading with CLI overrides
//! - Command execution

pub mod executor;
pub mod parser;

// Re-export public types for convenience
pub use executor::execute_command;
pub use parser::{Cli, Commands, MessageKind};

use crate::config::{ConfigError, Settings};
use crate::logger::init_logger;

/// Load configuration and apply CLI argument overrides
pub fn load_and_merge_config(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    apply_cli_overrides(cli, &mut settings);
    Ok(settings)
}

/// Apply CLI argument overrides to loaded settings
///
/// `--verbose`/`--quiet` adjust the log level; `send --proxy` overrides the
/// configured proxy for this invocation.
fn apply_cli_overrides(cli: &Cli, settings: &mut Settings) {
    if cli.verbose {
        settings.logger.level = "debug".to_string();
    } else if cli.quiet {
        settings.logger.level = "warn".to_string();
    }

    if let Commands::Send {
        proxy: Some(proxy), ..
    } = &cli.command
    {
        settings.api.proxy = Some(proxy.clone());
    }
}

/// Initialize logger from settings
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    init_logger(settings.logger.clone().into_logger_config())
}

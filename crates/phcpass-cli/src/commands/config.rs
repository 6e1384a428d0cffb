//! Configuration management CLI commands.

use std::process::ExitCode;

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use phcpass_core::config::AppConfig;
use phcpass_core::error::AppError;
use phcpass_hashing::Parameters;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<ExitCode, AppError> {
    match &args.command {
        ConfigCommand::Show => output::print_item(config, format),
        ConfigCommand::Validate => {
            let params = Parameters::from(&config.hasher);
            output::print_success(&format!("Configuration '{}' loaded", config_path));
            output::print_kv("Memory (KiB)", &params.memory.to_string());
            output::print_kv("Time cost", &params.time.to_string());
            output::print_kv("Parallelism", &params.parallelism.to_string());
            output::print_kv("Key length", &params.key_length.to_string());
            output::print_kv("Salt length", &config.hasher.salt_length.to_string());
            output::print_kv("Log level", &config.logging.level);
        }
    }

    Ok(ExitCode::SUCCESS)
}

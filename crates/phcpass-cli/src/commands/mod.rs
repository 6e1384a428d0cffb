//! CLI command definitions and dispatch.

pub mod config;
pub mod hash;
pub mod inspect;
pub mod verify;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use phcpass_core::config::AppConfig;
use phcpass_core::error::AppError;

/// phcpass — Argon2id password hashing in PHC string format
#[derive(Debug, Parser)]
#[command(name = "phcpass", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>`
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hash a password
    Hash(hash::HashArgs),
    /// Verify a password against a PHC string
    Verify(verify::VerifyArgs),
    /// Decode and describe a PHC string
    Inspect(inspect::InspectArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<ExitCode, AppError> {
        match &self.command {
            Commands::Hash(args) => hash::execute(args, config, self.format).await,
            Commands::Verify(args) => verify::execute(args, config, self.format).await,
            Commands::Inspect(args) => inspect::execute(args, config, self.format),
            Commands::Config(args) => config::execute(args, &self.config, config, self.format),
        }
    }
}

/// Helper: load configuration from file, overlay and environment
pub fn load_config(config_path: &str, env: Option<&str>) -> Result<AppConfig, AppError> {
    AppConfig::load_with_env(config_path, env)
}

/// Helper: read a password from the argument or prompt for it
pub fn read_password(password: Option<&str>, confirm: bool) -> Result<String, AppError> {
    if let Some(p) = password {
        return Ok(p.to_string());
    }

    let prompt = dialoguer::Password::new().with_prompt("Password");
    let prompt = if confirm {
        prompt.with_confirmation("Confirm password", "Passwords do not match")
    } else {
        prompt
    };

    prompt
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}

/// Helper: run a CPU-bound derivation off the async runtime
pub async fn run_blocking<T, F>(task: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
}

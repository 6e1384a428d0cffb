//! Password hashing command.

use std::process::ExitCode;

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use phcpass_core::config::AppConfig;
use phcpass_core::error::AppError;
use phcpass_hashing::{Argon2idHasher, PasswordHasher};

/// Arguments for the hash command
#[derive(Debug, Args)]
pub struct HashArgs {
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct HashOutput {
    hash: String,
}

/// Execute the hash command
pub async fn execute(
    args: &HashArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<ExitCode, AppError> {
    let password = super::read_password(args.password.as_deref(), true)?;
    let hasher = Argon2idHasher::new(&config.hasher);

    let hash = super::run_blocking(move || Ok(hasher.hash(&password)?)).await?;

    match format {
        OutputFormat::Table => println!("{}", hash),
        OutputFormat::Json => output::print_json(&HashOutput { hash }),
    }

    Ok(ExitCode::SUCCESS)
}

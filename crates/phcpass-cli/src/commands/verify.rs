//! Password verification command.

use std::process::ExitCode;

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use phcpass_core::config::AppConfig;
use phcpass_core::error::AppError;
use phcpass_hashing::{Argon2idHasher, PasswordHasher};

/// Exit code reported when the password does not match.
const MISMATCH: u8 = 2;

/// Arguments for the verify command
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Stored PHC string
    #[arg(long)]
    pub hash: String,

    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct VerifyOutput {
    matches: bool,
    needs_rehash: bool,
}

/// Execute the verify command
pub async fn execute(
    args: &VerifyArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<ExitCode, AppError> {
    let password = super::read_password(args.password.as_deref(), false)?;
    let hasher = Argon2idHasher::new(&config.hasher);
    let encoded = args.hash.clone();

    let result = super::run_blocking(move || {
        let matches = hasher.is_same(&password, &encoded)?;
        let needs_rehash = hasher.needs_rehash(&encoded)?;
        Ok(VerifyOutput {
            matches,
            needs_rehash,
        })
    })
    .await?;

    match format {
        OutputFormat::Table => {
            if result.matches {
                output::print_success("Password matches");
                if result.needs_rehash {
                    output::print_warning("Hash parameters differ from configuration; rehash recommended");
                }
            } else {
                output::print_warning("Password does not match");
            }
        }
        OutputFormat::Json => output::print_json(&result),
    }

    Ok(if result.matches {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(MISMATCH)
    })
}

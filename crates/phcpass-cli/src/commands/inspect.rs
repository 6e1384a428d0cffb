//! PHC string inspection command.

use std::process::ExitCode;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use phcpass_core::config::AppConfig;
use phcpass_core::error::AppError;
use phcpass_hashing::{Argon2idHasher, phc};

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// PHC string to decode
    pub encoded: String,
}

/// Parameter display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ParamRow {
    /// Name
    name: String,
    /// Value
    value: String,
}

#[derive(Debug, Serialize)]
struct InspectOutput {
    id: String,
    version: Option<String>,
    params: Vec<ParamRow>,
    salt_length: usize,
    hash_length: usize,
    /// `None` when the string cannot be verified by this build.
    needs_rehash: Option<bool>,
    unsupported_reason: Option<String>,
}

/// Execute the inspect command
pub fn execute(
    args: &InspectArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<ExitCode, AppError> {
    let record = phc::decode(&args.encoded)?;
    let hasher = Argon2idHasher::new(&config.hasher);

    let (needs_rehash, unsupported_reason) = match hasher.needs_rehash(&args.encoded) {
        Ok(rehash) => (Some(rehash), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let report = InspectOutput {
        id: record.id().to_string(),
        version: record.version().map(str::to_string),
        params: record
            .params()
            .iter()
            .map(|p| ParamRow {
                name: p.name().to_string(),
                value: p.value().to_string(),
            })
            .collect(),
        salt_length: record.salt().map_or(0, <[u8]>::len),
        hash_length: record.hash().map_or(0, <[u8]>::len),
        needs_rehash,
        unsupported_reason,
    };

    match format {
        OutputFormat::Table => {
            output::print_kv("Algorithm", &report.id);
            output::print_kv("Version", report.version.as_deref().unwrap_or("-"));
            output::print_kv("Salt length", &report.salt_length.to_string());
            output::print_kv("Hash length", &report.hash_length.to_string());
            match (report.needs_rehash, &report.unsupported_reason) {
                (Some(rehash), _) => output::print_kv("Needs rehash", &rehash.to_string()),
                (None, Some(reason)) => output::print_kv("Verifiable", reason),
                (None, None) => {}
            }
            println!("  Parameters:");
            output::print_table(&report.params);
        }
        OutputFormat::Json => output::print_json(&report),
    }

    Ok(ExitCode::SUCCESS)
}

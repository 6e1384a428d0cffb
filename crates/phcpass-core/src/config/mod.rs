//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file, an optional environment overlay and `PHCPASS_`
//! environment variables. Every field has a default, so an empty
//! configuration is valid.

pub mod hasher;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::hasher::HasherConfig;
use self::logging::LoggingConfig;

use crate::result::AppResult;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Password hasher tuning.
    #[serde(default)]
    pub hasher: HasherConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `path` with no environment overlay.
    pub fn load(path: &str) -> AppResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Load configuration from `path`, merged with `config/{env}` when given
    /// and with environment variables prefixed with `PHCPASS_`.
    ///
    /// Nested keys use `__` as separator, e.g. `PHCPASS_HASHER__TIME_COST=3`.
    pub fn load_with_env(path: &str, env: Option<&str>) -> AppResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("PHCPASS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;

        tracing::debug!(
            path = %path,
            memory_cost = loaded.hasher.memory_cost,
            time_cost = loaded.hasher.time_cost,
            parallelism = loaded.hasher.parallelism,
            "Configuration loaded"
        );

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.hasher, HasherConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phcpass.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[hasher]\nmemory_cost = 65536\ntime_cost = 2\nparallelism = 4\n\n[logging]\nformat = \"pretty\""
        )
        .unwrap();

        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.hasher.memory_cost, 65536);
        assert_eq!(config.hasher.time_cost, 2);
        assert_eq!(config.hasher.parallelism, 4);
        assert_eq!(config.hasher.key_length, 32);
        assert_eq!(config.hasher.salt_length, 16);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_invalid_value_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[hasher]\nparallelism = 300\n").unwrap();

        let err = AppConfig::load(path.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
        assert!(err.message.starts_with("Configuration error"));
        assert!(err.source().is_some());
    }
}

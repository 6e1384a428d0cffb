//! Password hasher configuration.

use serde::{Deserialize, Serialize};

/// Argon2id tuning and salt settings.
///
/// Values are passed through to the key derivation function unchanged;
/// range checks are left to the KDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasherConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_cost")]
    pub memory_cost: u32,
    /// Number of passes over memory.
    #[serde(default = "default_time_cost")]
    pub time_cost: u32,
    /// Number of lanes.
    #[serde(default = "default_parallelism")]
    pub parallelism: u8,
    /// Derived key length in bytes.
    #[serde(default = "default_key_length")]
    pub key_length: u32,
    /// Random salt length in bytes.
    #[serde(default = "default_salt_length")]
    pub salt_length: usize,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_cost: default_memory_cost(),
            time_cost: default_time_cost(),
            parallelism: default_parallelism(),
            key_length: default_key_length(),
            salt_length: default_salt_length(),
        }
    }
}

fn default_memory_cost() -> u32 {
    46 * 1024
}

fn default_time_cost() -> u32 {
    1
}

fn default_parallelism() -> u8 {
    1
}

fn default_key_length() -> u32 {
    32
}

fn default_salt_length() -> usize {
    16
}

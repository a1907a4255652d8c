//! Environment Configuration
//!
//! | Variable               | Default  |
//! |------------------------|----------|
//! | `ARGON2ID_MEMORY`      | `131072` |
//! | `ARGON2ID_TIME`        | `6`      |
//! | `ARGON2ID_PARALLELISM` | `4`      |
//! | `ARGON2ID_SALT_LENGTH` | `16`     |
//! | `ARGON2ID_KEY_LENGTH`  | `32`     |
//!
//! Unset variables take the [`Params::hardened`] value. A variable that is
//! set but not a positive integer is an error, never a silent default.

use std::str::FromStr;

use thiserror::Error;

use crate::params::Params;

pub const ENV_MEMORY: &str = "ARGON2ID_MEMORY";
pub const ENV_TIME: &str = "ARGON2ID_TIME";
pub const ENV_PARALLELISM: &str = "ARGON2ID_PARALLELISM";
pub const ENV_SALT_LENGTH: &str = "ARGON2ID_SALT_LENGTH";
pub const ENV_KEY_LENGTH: &str = "ARGON2ID_KEY_LENGTH";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid {key}: expected a positive integer, got {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Params {
    /// Load parameters from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load parameters through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Params::hardened();

        let params = Params {
            memory_kib: read(&lookup, ENV_MEMORY, defaults.memory_kib)?,
            time_cost: read(&lookup, ENV_TIME, defaults.time_cost)?,
            parallelism: read(&lookup, ENV_PARALLELISM, defaults.parallelism)?,
            salt_len: read(&lookup, ENV_SALT_LENGTH, defaults.salt_len)?,
            output_len: read(&lookup, ENV_KEY_LENGTH, defaults.output_len)?,
        };

        tracing::debug!(
            memory_kib = params.memory_kib,
            time_cost = params.time_cost,
            parallelism = params.parallelism,
            salt_len = params.salt_len,
            output_len = params.output_len,
            "Loaded Argon2id parameters"
        );

        Ok(params)
    }
}

fn read<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value = raw.trim();
    let invalid = || ConfigError::Invalid {
        key,
        value: raw.clone(),
    };

    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match value.parse::<T>() {
        Ok(parsed) if parsed != T::default() => Ok(parsed),
        _ => Err(invalid()),
    }
}

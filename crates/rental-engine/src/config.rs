//! Engine configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default        |
//! |-------------------------------|----------------|
//! | `RENTAL_DB_PATH`              | `./rental.db`  |
//! | `RENTAL_DB_MAX_CONNECTIONS`   | `5`            |
//! | `RENTAL_SETTLEMENT_TTL_SECS`  | `1800`         |

use std::env;
use std::path::PathBuf;

use rental_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Upper bound for `RENTAL_SETTLEMENT_TTL_SECS` (one day).
pub const MAX_SETTLEMENT_TTL_SECS: u64 = 86_400;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Seconds a pending settlement survives without being paid
    pub settlement_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            db_path: PathBuf::from("./rental.db"),
            db_max_connections: 5,
            settlement_ttl_secs: 1800, // 30 minutes
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();

        let config = EngineConfig {
            db_path: lookup("RENTAL_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            db_max_connections: parse_or(
                &lookup,
                "RENTAL_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,

            settlement_ttl_secs: parse_or(
                &lookup,
                "RENTAL_SETTLEMENT_TTL_SECS",
                defaults.settlement_ttl_secs,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "RENTAL_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if config.settlement_ttl_secs == 0 || config.settlement_ttl_secs > MAX_SETTLEMENT_TTL_SECS {
            return Err(ConfigError::InvalidValue(
                "RENTAL_SETTLEMENT_TTL_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone()).max_connections(self.db_max_connections)
    }

    /// Settlement time-to-live.
    pub fn settlement_ttl(&self) -> chrono::Duration {
        let secs = self.settlement_ttl_secs.min(MAX_SETTLEMENT_TTL_SECS);
        chrono::Duration::seconds(secs as i64)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Balance-mutation settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger configuration.
///
/// Controls how long a balance mutation may wait for the exclusive
/// lock on a wallet row. `None` waits indefinitely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Lock wait timeout in milliseconds.
    #[serde(default)]
    pub lock_timeout_ms: Option<u64>,
}

impl LedgerConfig {
    /// Returns the lock wait timeout, if one is configured.
    ///
    /// A configured value of zero is treated as "no timeout".
    #[must_use]
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("TALLY__DATABASE__URL", Some("postgres://localhost/tally_test")),
                ("TALLY__SERVER__PORT", Some("9100")),
                ("TALLY__LEDGER__LOCK_TIMEOUT_MS", Some("250")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/tally_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.port, 9100);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(
                    config.ledger.lock_timeout(),
                    Some(Duration::from_millis(250))
                );
            },
        );
    }

    #[test]
    fn test_ledger_defaults_to_no_timeout() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("TALLY__DATABASE__URL", Some("postgres://localhost/tally_test")),
                ("TALLY__LEDGER__LOCK_TIMEOUT_MS", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert!(config.ledger.lock_timeout().is_none());
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test")),
                ("TALLY__DATABASE__URL", None::<&str>),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_zero_lock_timeout_means_none() {
        let ledger = LedgerConfig {
            lock_timeout_ms: Some(0),
        };
        assert!(ledger.lock_timeout().is_none());
    }
}

//! Configuration module for Feedmill.

use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::{FeedmillError, Result};

/// Default background fetch interval in seconds.
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 60;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory of sandbox feed fixtures served under /test_feeds.
    #[serde(default = "default_test_feeds_path")]
    pub test_feeds_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_test_feeds_path() -> String {
    "test_feeds".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            test_feeds_path: default_test_feeds_path(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/feedmill.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/feedmill.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Feed fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Whether the background fetcher is enabled.
    #[serde(default = "default_background_enabled")]
    pub background_enabled: bool,
    /// Background fetch interval in whole seconds. Non-positive values fall
    /// back to the default at startup.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: i64,
    /// Per-request HTTP timeout in seconds. 0 disables the timeout; a hung
    /// origin then occupies its worker until the connection dies.
    #[serde(default)]
    pub request_timeout_secs: u64,
}

fn default_background_enabled() -> bool {
    true
}

fn default_interval_secs() -> i64 {
    DEFAULT_FETCH_INTERVAL_SECS as i64
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            background_enabled: default_background_enabled(),
            interval_secs: default_interval_secs(),
            request_timeout_secs: 0,
        }
    }
}

impl FetchConfig {
    /// Background fetch interval with invalid values corrected.
    ///
    /// The interval must be at least one second; anything else falls back to
    /// the default with a warning.
    pub fn effective_interval_secs(&self) -> u64 {
        if self.interval_secs < 1 {
            warn!(
                configured = self.interval_secs,
                fallback = DEFAULT_FETCH_INTERVAL_SECS,
                "invalid background fetch interval, using default"
            );
            DEFAULT_FETCH_INTERVAL_SECS
        } else {
            self.interval_secs as u64
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Feed fetching configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FeedmillError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FeedmillError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FEEDMILL_DATABASE_PATH`: override the SQLite database path
    /// - `FEEDMILL_BACKGROUND_FETCH_ENABLED`: true/false/1/0/yes/no/on/off
    /// - `FEEDMILL_BACKGROUND_FETCH_INTERVAL`: interval in whole seconds
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FEEDMILL_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }

        if let Ok(value) = std::env::var("FEEDMILL_BACKGROUND_FETCH_ENABLED") {
            if !value.is_empty() {
                self.fetch.background_enabled = parse_bool(&value);
            }
        }

        if let Ok(value) = std::env::var("FEEDMILL_BACKGROUND_FETCH_INTERVAL") {
            match value.trim().parse::<i64>() {
                Ok(secs) => self.fetch.interval_secs = secs,
                Err(_) => {
                    warn!(
                        value = %value,
                        "invalid FEEDMILL_BACKGROUND_FETCH_INTERVAL, keeping configured interval"
                    );
                }
            }
        }
    }
}

/// Parse a permissive boolean from an environment variable.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.server.test_feeds_path, "test_feeds");

        assert_eq!(config.database.path, "data/feedmill.db");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/feedmill.log");

        assert!(config.fetch.background_enabled);
        assert_eq!(config.fetch.interval_secs, 60);
        assert_eq!(config.fetch.request_timeout_secs, 0);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
test_feeds_path = "fixtures/feeds"

[database]
path = "custom/db.sqlite"

[logging]
level = "debug"
file = "custom/logs/app.log"

[fetch]
background_enabled = false
interval_secs = 300
request_timeout_secs = 30
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.test_feeds_path, "fixtures/feeds");
        assert_eq!(config.database.path, "custom/db.sqlite");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
        assert!(!config.fetch.background_enabled);
        assert_eq!(config.fetch.interval_secs, 300);
        assert_eq!(config.fetch.request_timeout_secs, 30);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[fetch]
interval_secs = 120
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.fetch.interval_secs, 120);
        assert!(config.fetch.background_enabled);
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.database.path, "data/feedmill.db");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.fetch.interval_secs, 60);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(FeedmillError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");

        assert!(result.is_err());
        assert!(matches!(result, Err(FeedmillError::Io(_))));
    }

    #[test]
    fn test_effective_interval_valid() {
        let fetch = FetchConfig {
            interval_secs: 90,
            ..FetchConfig::default()
        };
        assert_eq!(fetch.effective_interval_secs(), 90);
    }

    #[test]
    fn test_effective_interval_falls_back_on_zero() {
        let fetch = FetchConfig {
            interval_secs: 0,
            ..FetchConfig::default()
        };
        assert_eq!(fetch.effective_interval_secs(), DEFAULT_FETCH_INTERVAL_SECS);
    }

    #[test]
    fn test_effective_interval_falls_back_on_negative() {
        let fetch = FetchConfig {
            interval_secs: -5,
            ..FetchConfig::default()
        };
        assert_eq!(fetch.effective_interval_secs(), DEFAULT_FETCH_INTERVAL_SECS);
    }

    #[test]
    fn test_parse_bool_values() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));

        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("banana"));
    }

    #[test]
    fn test_apply_env_overrides_interval() {
        let original = std::env::var("FEEDMILL_BACKGROUND_FETCH_INTERVAL").ok();

        std::env::set_var("FEEDMILL_BACKGROUND_FETCH_INTERVAL", "15");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.fetch.interval_secs, 15);

        if let Some(val) = original {
            std::env::set_var("FEEDMILL_BACKGROUND_FETCH_INTERVAL", val);
        } else {
            std::env::remove_var("FEEDMILL_BACKGROUND_FETCH_INTERVAL");
        }
    }

    #[test]
    fn test_apply_env_overrides_invalid_interval_keeps_config() {
        let original = std::env::var("FEEDMILL_BACKGROUND_FETCH_INTERVAL").ok();

        std::env::set_var("FEEDMILL_BACKGROUND_FETCH_INTERVAL", "soon");

        let mut config = Config::default();
        config.fetch.interval_secs = 45;
        config.apply_env_overrides();
        assert_eq!(config.fetch.interval_secs, 45);

        if let Some(val) = original {
            std::env::set_var("FEEDMILL_BACKGROUND_FETCH_INTERVAL", val);
        } else {
            std::env::remove_var("FEEDMILL_BACKGROUND_FETCH_INTERVAL");
        }
    }

    #[test]
    fn test_apply_env_overrides_enabled() {
        let original = std::env::var("FEEDMILL_BACKGROUND_FETCH_ENABLED").ok();

        std::env::set_var("FEEDMILL_BACKGROUND_FETCH_ENABLED", "off");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert!(!config.fetch.background_enabled);

        if let Some(val) = original {
            std::env::set_var("FEEDMILL_BACKGROUND_FETCH_ENABLED", val);
        } else {
            std::env::remove_var("FEEDMILL_BACKGROUND_FETCH_ENABLED");
        }
    }
}

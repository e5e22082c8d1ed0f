//! Environment-driven server configuration.
//!
//! Every key is optional; unset or blank values fall back to defaults.

use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use subtrack_core::default_log_level;

pub const ENV_BIND: &str = "SUBTRACK_BIND";
pub const ENV_DB_PATH: &str = "SUBTRACK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SUBTRACK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SUBTRACK_LOG_DIR";
pub const ENV_SEED_DEMO: &str = "SUBTRACK_SEED_DEMO";

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_DB_PATH: &str = "subtrack.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when `None`.
    pub log_dir: Option<String>,
    /// Insert demo rows at startup when the table is empty.
    pub seed_demo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBind { value: String, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBind { value, reason } => {
                write!(f, "{ENV_BIND}=`{value}` is not a socket address: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind = read(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBind {
                value: bind.clone(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            bind_addr,
            db_path: PathBuf::from(
                read(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            ),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR),
            seed_demo: read(ENV_SEED_DEMO).is_some_and(|value| parse_flag(&value)),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig, ENV_BIND, ENV_DB_PATH, ENV_LOG_DIR, ENV_SEED_DEMO};
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.db_path.to_str(), Some("subtrack.sqlite3"));
        assert_eq!(config.log_dir, None);
        assert!(!config.seed_demo);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            (ENV_BIND, "0.0.0.0:8080"),
            (ENV_DB_PATH, "/var/lib/subtrack/data.db"),
            (ENV_LOG_DIR, " /var/log/subtrack "),
            (ENV_SEED_DEMO, "YES"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db_path.to_str(), Some("/var/lib/subtrack/data.db"));
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/subtrack"));
        assert!(config.seed_demo);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(ENV_BIND, "  "), (ENV_SEED_DEMO, "")]).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(!config.seed_demo);
    }

    #[test]
    fn malformed_bind_is_rejected() {
        let err = config_from(&[(ENV_BIND, "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind { .. }));
    }
}

use dotenv::dotenv;
use dotenv::from_path;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load .env file from path {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("Invalid {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Which Storage Gateway implementation backs the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "database" => Ok(StorageBackend::Sqlite),
            "memory" | "session" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "STORAGE_BACKEND",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub storage_backend: StorageBackend,
    pub api_host: String,
    pub api_port: u16,
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the root `.env` file.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        } else {
            dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup; missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Sqlite,
        };

        let api_port = match lookup("API_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT",
                value,
            })?,
            None => 4567,
        };

        let session_ttl_secs = match lookup("SESSION_TTL_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SESSION_TTL_SECS",
                value,
            })?,
            None => 86_400,
        };

        Ok(Config {
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "todos.db".to_string()),
            storage_backend,
            api_host: lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            api_port,
            session_ttl: Duration::from_secs(session_ttl_secs),
        })
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.database_path, "todos.db");
        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
        assert_eq!(config.api_address(), "127.0.0.1:4567");
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "Memory"),
            ("API_PORT", "8080"),
            ("API_HOST", "0.0.0.0"),
            ("SESSION_TTL_SECS", "600"),
        ]))
        .unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(600));
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.api_address(), "0.0.0.0:8080");
    }

    #[test]
    fn rejects_bad_port_and_backend() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("API_PORT", "eighty")])),
            Err(ConfigError::InvalidValue { key: "API_PORT", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "redis")])),
            Err(ConfigError::InvalidValue { key: "STORAGE_BACKEND", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("SESSION_TTL_SECS", "-1")])),
            Err(ConfigError::InvalidValue { key: "SESSION_TTL_SECS", .. })
        ));
    }
}

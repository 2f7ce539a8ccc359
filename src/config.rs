use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};

/// `DATABASE_URL` value that selects the in-memory document store.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub ids: IdConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    pub worker_id: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://tuiter.db?mode=rwc".to_string(),
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            ids: IdConfig { worker_id: 0 },
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
                    Some(raw) => parse_var("SERVER_PORT", &raw)?,
                    None => defaults.server.port,
                },
            },
            ids: IdConfig {
                worker_id: match lookup("ID_WORKER") {
                    Some(raw) => parse_var("ID_WORKER", &raw)?,
                    None => defaults.ids.worker_id,
                },
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database.url == MEMORY_DATABASE_URL
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim().parse().map_err(|_| {
        AppError::ConfigurationError(format!("Invalid value for {}: {:?}", key, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:4000");
        assert_eq!(config.ids.worker_id, 0);
        assert!(!config.uses_memory_store());
    }

    #[test]
    fn port_falls_back_to_port_var() {
        let config = Config::from_lookup(lookup(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.server.port, 8080);

        let config =
            Config::from_lookup(lookup(&[("PORT", "8080"), ("SERVER_PORT", "9090")])).unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn memory_url_selects_memory_store() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "memory")])).unwrap();
        assert!(config.uses_memory_store());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[("SERVER_PORT", "http")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));

        let err = Config::from_lookup(lookup(&[("ID_WORKER", "-1")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }
}

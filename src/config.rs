//! Server configuration
//!
//! Configuration is read from environment variables (optionally via a `.env`
//! file loaded in `main`). Every field has a sensible default so the server
//! can start with no configuration at all.

use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub textgen: TextGenConfig,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://marginalia.db`
    pub url: String,
}

/// Text-generation backend settings
#[derive(Debug, Clone)]
pub struct TextGenConfig {
    /// Base URL of the generation API (Ollama-compatible)
    pub base_url: String,
    /// Model name to request
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite://marginalia.db".to_string(),
            },
            textgen: TextGenConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Ok(host) = std::env::var("MARGINALIA_HOST") {
            config.server.host = host.parse().map_err(|_| ConfigError::InvalidValue {
                var: "MARGINALIA_HOST",
                value: host,
            })?;
        }

        if let Ok(port) = std::env::var("MARGINALIA_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                var: "MARGINALIA_PORT",
                value: port,
            })?;
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        if let Ok(base_url) = std::env::var("TEXTGEN_URL") {
            config.textgen.base_url = base_url;
        }

        if let Ok(model) = std::env::var("TEXTGEN_MODEL") {
            config.textgen.model = model;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert!(config.database.url.starts_with("sqlite://"));
    }
}

//! Server Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,
    /// Taxonomy cache settings
    pub cache: CacheConfig,
    /// Page size used when a listing request names none
    pub default_page_limit: u32,
}

/// Taxonomy cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries per kind (categories, tags)
    pub capacity: u64,
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            cache: CacheConfig::default(),
            default_page_limit: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl_secs: 300,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl ServerConfig {
    /// Load from a JSON file; missing members take their defaults
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{ "bind_addr": "127.0.0.1:9000", "cache": { "ttl_secs": 5 } }"#)
                .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.cache.capacity, 10_000);
        assert_eq!(config.cache.ttl(), Duration::from_secs(5));
        assert_eq!(config.default_page_limit, 10);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ServerConfig::load("/nonexistent/cms/server.json"),
            Err(ConfigError::Io(_))
        ));
    }
}

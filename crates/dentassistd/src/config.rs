//! Configuration management for dentassistd.
//!
//! Loads settings from /etc/dentassist/config.toml or uses defaults, then
//! applies environment overrides (`ML_SERVICE_URL`, `DENTASSIST_LISTEN`).

use anyhow::Result;
use dentassist_shared::wire::DEFAULT_ML_SERVICE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/dentassist/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/dentassist/config.toml";

/// Upstream ML endpoint override
pub const ENV_ML_SERVICE_URL: &str = "ML_SERVICE_URL";

/// Bind address override
pub const ENV_LISTEN: &str = "DENTASSIST_LISTEN";

/// Explicit config path override
pub const ENV_CONFIG: &str = "DENTASSIST_CONFIG";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the proxy binds to
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Largest accepted request body (base64 images are big)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    /// Allow any origin, so a browser front end on another port can call us
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_body_limit() -> usize {
    50 * 1024 * 1024
}

fn default_cors_permissive() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            body_limit_bytes: default_body_limit(),
            cors_permissive: default_cors_permissive(),
        }
    }
}

/// External ML service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub url: String,

    /// Per-request timeout towards the ML service
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

fn default_upstream_url() -> String {
    DEFAULT_ML_SERVICE_URL.to_string()
}

fn default_upstream_timeout() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl Config {
    /// Load config from file (or defaults) and apply environment overrides
    pub fn load() -> Self {
        let mut config = match std::env::var(ENV_CONFIG) {
            Ok(path) => Self::load_from_path(&path).unwrap_or_else(|e| {
                warn!("Could not load {}: {}, using defaults", path, e);
                Config::default()
            }),
            Err(_) => Self::load_from_path(CONFIG_PATH)
                .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
                .unwrap_or_else(|e| {
                    warn!("Config not found, using defaults: {}", e);
                    Config::default()
                }),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load config from specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_ML_SERVICE_URL).filter(|v| !v.trim().is_empty()) {
            self.upstream.url = url.trim().to_string();
        }
        if let Some(listen) = lookup(ENV_LISTEN).filter(|v| !v.trim().is_empty()) {
            self.server.listen = listen.trim().to_string();
        }
    }

    /// Save default config to path (for init)
    pub fn save_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(&Config::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Saved default config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.listen, "127.0.0.1:8080");
        assert_eq!(config.server.body_limit_bytes, 50 * 1024 * 1024);
        assert_eq!(config.upstream.url, "http://localhost:5000");
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[upstream]
url = "http://ml.internal:5000"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.upstream.url, "http://ml.internal:5000");
        // Defaults for missing fields
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(config.server.cors_permissive);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            ENV_ML_SERVICE_URL => Some(" http://10.0.0.5:5000 ".to_string()),
            ENV_LISTEN => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.upstream.url, "http://10.0.0.5:5000");
        // Blank values are ignored
        assert_eq!(config.server.listen, "127.0.0.1:8080");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        Config::save_default(&path).unwrap();
        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.server.listen, Config::default().server.listen);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[upstream\nurl = 3").unwrap();
        assert!(Config::load_from_path(&path).is_err());
    }
}

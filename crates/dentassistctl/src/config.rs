//! CLI configuration and persisted preferences.
//!
//! Both live under `$XDG_CONFIG_HOME/dentassist/`: `config.toml` for the
//! proxy connection and triage policy, `preferences.toml` for the chosen
//! language.

use anyhow::Result;
use dentassist_shared::scoring::{ResolverPolicy, EMERGENCY_BELOW, GOOD_FROM};
use dentassist_shared::{Language, Localizer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Explicit proxy URL override
pub const ENV_PROXY_URL: &str = "DENTASSIST_PROXY_URL";

const CONFIG_FILE: &str = "config.toml";
const PREFERENCES_FILE: &str = "preferences.toml";

/// Directory holding both files
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("dentassist")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Where dentassistd listens
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,

    /// Client-side timeout for a prediction round trip
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Scores below this are an emergency
    #[serde(default = "default_emergency_below")]
    pub emergency_below: u8,

    /// Use the model's overall score over `100 - confidence` when both exist
    #[serde(default = "default_prefer_reported")]
    pub prefer_reported_score: bool,
}

fn default_proxy_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_emergency_below() -> u8 {
    EMERGENCY_BELOW
}

fn default_prefer_reported() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            timeout_secs: default_timeout_secs(),
            emergency_below: default_emergency_below(),
            prefer_reported_score: default_prefer_reported(),
        }
    }
}

impl ClientConfig {
    /// Load from the user config dir, falling back to defaults
    pub fn load() -> Self {
        let path = config_dir().join(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from_path(&path).unwrap_or_else(|e| {
                warn!("Ignoring invalid {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        };
        if let Ok(url) = std::env::var(ENV_PROXY_URL) {
            if !url.trim().is_empty() {
                config.proxy_url = url.trim().to_string();
            }
        }
        config
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolver thresholds derived from this config
    pub fn policy(&self) -> ResolverPolicy {
        ResolverPolicy {
            prefer_reported_score: self.prefer_reported_score,
            good_from: GOOD_FROM,
            emergency_below: self.emergency_below.min(GOOD_FROM),
        }
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "selectedLanguage", default, skip_serializing_if = "Option::is_none")]
    pub selected_language: Option<String>,
}

impl Preferences {
    pub fn path() -> PathBuf {
        config_dir().join(PREFERENCES_FILE)
    }

    /// Missing or unreadable preferences are treated as empty
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring invalid {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                debug!("No preferences at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn localizer(&self) -> Localizer {
        Localizer::from_stored(self.selected_language.as_deref())
    }

    pub fn set_language(&mut self, language: Language) {
        self.selected_language = Some(language.code().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.proxy_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.policy(), ResolverPolicy::default());
    }

    #[test]
    fn test_partial_toml_and_legacy_threshold() {
        let config: ClientConfig = toml::from_str("emergency_below = 40").unwrap();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.policy(), ResolverPolicy::legacy());
    }

    #[test]
    fn test_preferences_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dentassist/preferences.toml");

        assert_eq!(Preferences::load_from_path(&path), Preferences::default());

        let mut prefs = Preferences::default();
        prefs.set_language(Language::Ur);
        prefs.save_to_path(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("selectedLanguage = \"ur\""));

        let loaded = Preferences::load_from_path(&path);
        assert_eq!(loaded.localizer().language(), Language::Ur);
    }

    #[test]
    fn test_unknown_stored_language_falls_back() {
        let prefs = Preferences {
            selected_language: Some("xx".to_string()),
        };
        assert_eq!(prefs.localizer().language(), Language::En);
    }
}

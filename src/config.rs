use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "PROMPTMAKER_DIR";
const DEFAULT_STATE_DIR: &str = ".promptmaker";
const DEFAULT_SHARE_BASE: &str = "http://localhost:3000/";

/// Configuration for the remote advisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// API key; `None` disables the advisor
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub model: String,
    /// Sampling temperature sent with advisor requests
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_secs: 30,
        }
    }
}

impl AdvisorConfig {
    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty("OPENAI_API_KEY"),
            base_url: non_empty("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: non_empty("OPENAI_MODEL").unwrap_or(defaults.model),
            ..defaults
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Where local state lives and how share links are built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub state_dir: PathBuf,
    pub share_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            share_base_url: DEFAULT_SHARE_BASE.to_string(),
        }
    }
}

impl AppConfig {
    /// Explicit directory wins, then `PROMPTMAKER_DIR`, then `.promptmaker`.
    pub fn resolve(state_dir: Option<PathBuf>) -> Self {
        let state_dir = state_dir
            .or_else(|| env::var_os(STATE_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));
        Self {
            state_dir,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_advisor_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_advisor_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9999/v1"),
            ("OPENAI_MODEL", ""),
        ]
        .into_iter()
        .collect();

        let config = AdvisorConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert!(config.is_enabled());
        assert_eq!(config.base_url, "http://localhost:9999/v1");
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = AdvisorConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_explicit_state_dir_wins() {
        let config = AppConfig::resolve(Some(PathBuf::from("/tmp/pm")));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/pm"));
        assert_eq!(config.share_base_url, "http://localhost:3000/");
    }
}

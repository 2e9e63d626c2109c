use crate::services::ENTRIES_PATH;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://jockey-scratch-card-backend.vercel.app";
/// Environment variable that overrides `base_url`
pub const BASE_URL_ENV: &str = "CUSTOMERS_TUI_BASE_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheme and host of the API, without the entries path
    pub base_url: String,
    /// Event poll timeout; also how often fetch results are picked up
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tick_rate_ms: 100,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".customers-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the config file (falling back to defaults) and apply env overrides
    pub fn load() -> Config {
        let config = Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.with_base_url_override(env::var(BASE_URL_ENV).ok())
    }

    /// Read a config file, `None` when missing or unreadable
    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not read config");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                None
            }
        }
    }

    /// Replace `base_url` with a non-blank override
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    /// Full URL of the entries resource
    pub fn entries_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ENTRIES_PATH)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_entries_url() {
        assert_eq!(
            Config::default().entries_url(),
            "https://jockey-scratch-card-backend.vercel.app/api/entries"
        );
    }

    #[test]
    fn test_entries_url_trims_trailing_slashes() {
        let config = Config {
            base_url: "http://localhost:3000//".to_string(),
            ..Config::default()
        };
        assert_eq!(config.entries_url(), "http://localhost:3000/api/entries");
    }

    #[test]
    fn test_base_url_override() {
        let config =
            Config::default().with_base_url_override(Some(" http://127.0.0.1:8080 ".into()));
        assert_eq!(config.base_url, "http://127.0.0.1:8080");

        let unchanged = Config::default().with_base_url_override(Some("   ".into()));
        assert_eq!(unchanged.base_url, DEFAULT_BASE_URL);

        let none = Config::default().with_base_url_override(None);
        assert_eq!(none, Config::default());
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "base_url": "http://example.test" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_load_from_missing_or_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Config::load_from(&path), None);

        fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load_from(&path), None);
    }

    #[test]
    fn test_tick_rate_has_floor() {
        let config = Config {
            tick_rate_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.tick_rate(), Duration::from_millis(10));
    }
}

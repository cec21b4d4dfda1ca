//! Client configuration.
//!
//! Reads `~/.quill/config.toml`. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use quill_query::{QueryOptions, Retry};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Overrides `api_url` when set.
pub const API_URL_ENV: &str = "QUILL_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// REST API base URL.
    pub api_url: String,

    /// Directory holding the local storage file. Empty means `~/.quill`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub data_dir: String,

    pub search_debounce_ms: u64,
    pub toast_ttl_ms: u64,
    pub comment_cooldown_ms: u64,
    pub stale_time_ms: u64,

    /// Extra attempts for failed queries. Mutations are never retried.
    pub retry: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: String::new(),
            search_debounce_ms: 500,
            toast_ttl_ms: 3000,
            comment_cooldown_ms: 1000,
            stale_time_ms: 0,
            retry: 3,
            retry_base_delay_ms: 1000,
        }
    }
}

impl ClientConfig {
    /// `~/.quill/config.toml`.
    pub fn default_path() -> PathBuf {
        quill_dir().join("config.toml")
    }

    /// Load from disk, then apply the environment override.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            Self::default()
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io)
    }

    /// Location of the redb storage file.
    pub fn storage_path(&self) -> PathBuf {
        let dir = if self.data_dir.is_empty() {
            quill_dir()
        } else {
            PathBuf::from(&self.data_dir)
        };
        dir.join("storage.redb")
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    pub fn comment_cooldown(&self) -> Duration {
        Duration::from_millis(self.comment_cooldown_ms)
    }

    /// Default options for every query the app runs.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::default()
            .stale_time(Duration::from_millis(self.stale_time_ms))
            .retry(Retry::Times(self.retry))
            .retry_base_delay(Duration::from_millis(self.retry_base_delay_ms))
    }
}

fn quill_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".quill")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.search_debounce_ms, 500);
        assert_eq!(config.toast_ttl(), Duration::from_secs(3));
        assert_eq!(config.comment_cooldown(), Duration::from_secs(1));
        assert_eq!(config.retry, 3);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/tmp/q\"\nretry = 0\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.retry, 0);
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/q/storage.redb"));
        assert_eq!(config.toast_ttl_ms, 3000);
        assert!(matches!(config.query_options().retry, Retry::Times(0)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let config = ClientConfig {
            api_url: "http://example.test/api".into(),
            stale_time_ms: 5000,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let back = ClientConfig::load(&path).unwrap();
        assert_eq!(back.stale_time_ms, 5000);
        assert_eq!(
            back.query_options().stale_time,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "retry = \"many\"").unwrap();
        assert!(matches!(
            ClientConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}

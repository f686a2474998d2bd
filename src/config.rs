//! Runtime configuration, loaded from `<config_dir>/hyperlaunch/config.json`.
//!
//! Every field is optional on disk; missing fields fall back to the defaults
//! below, and a missing or unreadable file falls back to `Config::default()`
//! with a warning. Timing knobs are in milliseconds.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{HyperlaunchError, Result};

/// Quiet period after the last input change before a search is issued.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Settle delay between the platform focus request and input readiness.
pub const DEFAULT_READY_SETTLE_MS: u64 = 50;

/// Maximum results returned by the search provider per request.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Maximum results handed to the presentation layer per render.
pub const DEFAULT_MAX_RENDERED: usize = 100;

/// Minimum query length before file contents are searched.
pub const DEFAULT_CONTENT_SEARCH_MIN_CHARS: usize = 4;

/// Files larger than this are skipped by the content search.
pub const DEFAULT_CONTENT_SEARCH_MAX_FILE_BYTES: u64 = 500_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_debounce_ms", rename = "debounceMs")]
    pub debounce_ms: u64,
    #[serde(default = "default_ready_settle_ms", rename = "readySettleMs")]
    pub ready_settle_ms: u64,
    #[serde(default = "default_max_results", rename = "maxResults")]
    pub max_results: usize,
    #[serde(default = "default_max_rendered", rename = "maxRendered")]
    pub max_rendered: usize,
    /// Root directory for file and content search. `~` is expanded; defaults
    /// to the home directory.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "searchRoot")]
    pub search_root: Option<String>,
    #[serde(
        default = "default_content_search_min_chars",
        rename = "contentSearchMinChars"
    )]
    pub content_search_min_chars: usize,
    #[serde(
        default = "default_content_search_max_file_bytes",
        rename = "contentSearchMaxFileBytes"
    )]
    pub content_search_max_file_bytes: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_ready_settle_ms() -> u64 {
    DEFAULT_READY_SETTLE_MS
}
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_max_rendered() -> usize {
    DEFAULT_MAX_RENDERED
}
fn default_content_search_min_chars() -> usize {
    DEFAULT_CONTENT_SEARCH_MIN_CHARS
}
fn default_content_search_max_file_bytes() -> u64 {
    DEFAULT_CONTENT_SEARCH_MAX_FILE_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            ready_settle_ms: DEFAULT_READY_SETTLE_MS,
            max_results: DEFAULT_MAX_RESULTS,
            max_rendered: DEFAULT_MAX_RENDERED,
            search_root: None,
            content_search_min_chars: DEFAULT_CONTENT_SEARCH_MIN_CHARS,
            content_search_max_file_bytes: DEFAULT_CONTENT_SEARCH_MAX_FILE_BYTES,
        }
    }
}

impl Config {
    /// The default on-disk location: `<config_dir>/hyperlaunch/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hyperlaunch").join("config.json"))
    }

    /// Load from an explicit path, failing loudly on any problem.
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .map_err(|e| HyperlaunchError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults if the file
    /// is missing or malformed.
    pub fn load_default() -> Config {
        let Some(path) = Self::config_path() else {
            debug!("no config directory available, using defaults");
            return Config::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring bad config file");
                Config::default()
            }
        }
    }

    /// Returns the search root with `~` expanded, defaulting to the home
    /// directory (and `/` as the last resort).
    pub fn search_root(&self) -> PathBuf {
        self.search_root
            .as_deref()
            .map(|root| PathBuf::from(shellexpand::tilde(root).into_owned()))
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.ready_settle_ms, 50);
        assert_eq!(config.max_results, 50);
        assert_eq!(config.max_rendered, 100);
        assert_eq!(config.content_search_min_chars, 4);
        assert_eq!(config.search_root, None);
    }

    #[test]
    fn test_partial_config_applies_defaults_fieldwise() {
        let config: Config = serde_json::from_str(r#"{"debounceMs": 100}"#).unwrap();
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.ready_settle_ms, 50);
        assert_eq!(config.max_rendered, 100);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.search_root = Some("/tmp/projects".to_string());
        config.max_results = 25;

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.max_results, 25);
        assert_eq!(parsed.search_root.as_deref(), Some("/tmp/projects"));
    }

    #[test]
    fn test_search_root_expands_tilde() {
        let mut config = Config::default();
        config.search_root = Some("~/projects".to_string());
        let root = config.search_root();
        assert!(!root.to_string_lossy().contains('~'));
        assert!(root.ends_with("projects"));
    }

    #[test]
    fn test_from_file_missing_is_error() {
        assert!(Config::from_file(Path::new("/nonexistent/config.json")).is_err());
    }

    #[test]
    fn test_from_file_reads_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"maxResults": 10, "searchRoot": "/srv"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.max_results, 10);
        assert_eq!(config.search_root(), PathBuf::from("/srv"));
    }
}

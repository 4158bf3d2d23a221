//! Core configuration
//!
//! All fields use `#[serde(default)]` so partial JSON files (or none at all)
//! deserialize to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

/// Environment variable overriding [`AutoSaveConfig::debounce_ms`]
pub const DEBOUNCE_ENV_VAR: &str = "SUMMANOTE_AUTOSAVE_DEBOUNCE_MS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub autosave: AutoSaveConfig,

    #[serde(default)]
    pub extraction: ExtractionLimits,
}

/// Auto-save coordinator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveConfig {
    /// Quiet period after the last edit before a save is issued (default: 1000 ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl AutoSaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    1000
}

/// Caps and heuristic thresholds for the extraction helpers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionLimits {
    /// Maximum quotes returned (default: 10)
    pub max_quotes: usize,
    /// Inline quoted spans must be longer than this many characters (default: 10)
    pub min_inline_quote_chars: usize,
    /// Max distance in characters between a quote and its timestamp (default: 100)
    pub timestamp_window_chars: usize,
    /// Maximum action items returned (default: 10)
    pub max_action_items: usize,
    /// Bullets taken by the fallback pass when no pattern matched (default: 5)
    pub max_fallback_actions: usize,
    /// Maximum glossary terms returned (default: 8)
    pub max_terms: usize,
    /// Terms must be shorter than this many characters (default: 50)
    pub max_term_chars: usize,
    /// Explanations must be at least this many characters (default: 20)
    pub min_explanation_chars: usize,
    /// TOC titles longer than this are rejected (default: 100)
    pub max_toc_title_chars: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_quotes: 10,
            min_inline_quote_chars: 10,
            timestamp_window_chars: 100,
            max_action_items: 10,
            max_fallback_actions: 5,
            max_terms: 8,
            max_term_chars: 50,
            min_explanation_chars: 20,
            max_toc_title_chars: 100,
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load config from a JSON file
    ///
    /// A missing file yields the defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !fs::try_exists(path).await? {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).await?;
        Self::from_json_str(&contents)
    }

    /// Apply environment overrides on top of this config
    ///
    /// Unparseable values are ignored with a warning.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(DEBOUNCE_ENV_VAR) {
            match raw.parse::<u64>() {
                Ok(ms) => self.autosave.debounce_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid {}={:?}", DEBOUNCE_ENV_VAR, raw),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();
        assert_eq!(config.autosave.debounce_ms, 1000);
        assert_eq!(config.extraction.max_quotes, 10);
        assert_eq!(config.extraction.max_action_items, 10);
        assert_eq!(config.extraction.max_terms, 8);
        assert_eq!(config.extraction.max_term_chars, 50);
        assert_eq!(config.extraction.min_explanation_chars, 20);
        assert_eq!(config.extraction.max_toc_title_chars, 100);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CoreConfig::from_json_str(r#"{"extraction": {"max_terms": 3}}"#).unwrap();
        assert_eq!(config.extraction.max_terms, 3);
        assert_eq!(config.extraction.max_quotes, 10);
        assert_eq!(config.autosave.debounce_ms, 1000);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        assert!(matches!(
            CoreConfig::from_json_str("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = CoreConfig::load(temp_dir.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("summanote.json");
        tokio::fs::write(&path, r#"{"autosave": {"debounce_ms": 250}}"#)
            .await
            .unwrap();

        let config = CoreConfig::load(&path).await.unwrap();
        assert_eq!(config.autosave.debounce(), Duration::from_millis(250));
    }
}

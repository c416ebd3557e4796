use crate::errors::{GeminiError, GeminiResult};
use crate::i18n::Language;
use crate::types::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "product-copywriter";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variables checked, in order, for the API key
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Configuration for the copywriter client and session defaults
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CopywriterConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
    pub language: Option<Language>,
    pub search_enabled: Option<bool>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl Default for CopywriterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: Some(DEFAULT_MODEL.to_string()),
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            language: Some(Language::Id),
            search_enabled: Some(false),
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            log_level: Some("info".to_string()),
        }
    }
}

impl CopywriterConfig {
    /// A config with every field unset, for use as a merge overlay
    pub fn empty() -> Self {
        Self {
            api_key: None,
            model_name: None,
            base_url: None,
            language: None,
            search_enabled: None,
            request_timeout_secs: None,
            log_level: None,
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                GeminiError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                GeminiError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            // Fields missing from the file keep their defaults
            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Loads from the default location under the user's config directory
    pub fn load_default() -> GeminiResult<Self> {
        let path = get_default_config_file(APP_NAME)?;
        Self::load_from_file(&path)
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            language: other.language.or(self.language),
            search_enabled: other.search_enabled.or(self.search_enabled),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Fills a missing API key from `.env` or the process environment
    pub fn with_env_api_key(mut self) -> Self {
        if self.api_key.is_none() {
            dotenvy::dotenv().ok();
            self.api_key = API_KEY_VARS
                .iter()
                .find_map(|var| env::var(var).ok().filter(|v| !v.trim().is_empty()));
        }
        self
    }

    pub fn language_or_default(&self) -> Language {
        self.language.unwrap_or_default()
    }

    pub fn search_enabled_or_default(&self) -> bool {
        self.search_enabled.unwrap_or(false)
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine home directory".to_string())
    })?;

    let config_dir = home_dir.join(".config").join(app_name);

    Ok(config_dir)
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GeminiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = CopywriterConfig::load_from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, CopywriterConfig::default());
        assert_eq!(config.model_name.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(config.language_or_default(), Language::Id);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "language = \"en\"\nsearch_enabled = true\n").unwrap();

        let config = CopywriterConfig::load_from_file(&path).unwrap();
        assert_eq!(config.language, Some(Language::En));
        assert_eq!(config.search_enabled, Some(true));
        assert_eq!(config.base_url_or_default(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "language = \"fr\"").unwrap();

        let err = CopywriterConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, GeminiError::ConfigError(_)));
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = CopywriterConfig::default();
        let mut overlay = CopywriterConfig::empty();
        overlay.model_name = Some("gemini-2.0-flash".to_string());
        overlay.search_enabled = Some(true);

        let merged = base.merge(&overlay);
        assert_eq!(merged.model_name.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(merged.search_enabled, Some(true));
        assert_eq!(merged.language, Some(Language::Id));
    }

    #[test]
    fn test_explicit_api_key_is_not_replaced_by_env() {
        let mut config = CopywriterConfig::empty();
        config.api_key = Some("from-flag".to_string());
        let config = config.with_env_api_key();
        assert_eq!(config.api_key.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_file_api_key_wins_over_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"from-file\"\n").unwrap();
        env::set_var("GEMINI_API_KEY", "from-env");

        let config = CopywriterConfig::load_from_file(&path)
            .unwrap()
            .merge(&CopywriterConfig::empty())
            .with_env_api_key();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }
}

//! Configuration management for StreamVibe
//!
//! Handles config file loading/saving and credential resolution.
//! Config is stored at ~/.config/streamvibe/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::SourceQuality;

/// Demo fallback when no API key is configured anywhere. Requests made
/// with it fail and the catalog degrades to placeholder data.
const FALLBACK_API_KEY: &str = "fallback_api_key";

/// Token-signing secret for development; override in any real deployment
const DEV_AUTH_SECRET: &str = "streamvibe-dev-secret";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: Option<String>,
    /// Secret used to sign session tokens
    pub auth_secret: Option<String>,
    /// Preferred streaming source quality ("4K", "HD", "SD")
    pub preferred_quality: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/streamvibe/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("streamvibe").join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path (--config flag)
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Resolve the TMDB API key:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Config file value
    /// 3. Demo fallback (catalog degrades to placeholders)
    pub fn tmdb_api_key(&self) -> String {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            if !key.is_empty() {
                return key;
            }
        }

        self.tmdb_api_key
            .clone()
            .unwrap_or_else(|| FALLBACK_API_KEY.to_string())
    }

    /// Resolve the token-signing secret:
    /// 1. Environment variable STREAMVIBE_AUTH_SECRET
    /// 2. Config file value
    /// 3. Development default
    pub fn auth_secret(&self) -> String {
        if let Ok(secret) = std::env::var("STREAMVIBE_AUTH_SECRET") {
            if !secret.is_empty() {
                return secret;
            }
        }

        self.auth_secret
            .clone()
            .unwrap_or_else(|| DEV_AUTH_SECRET.to_string())
    }

    /// Preferred streaming source quality, parsed from the config value.
    /// Unknown labels read as no preference.
    pub fn preferred_source_quality(&self) -> Option<SourceQuality> {
        self.preferred_quality
            .as_deref()
            .and_then(SourceQuality::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.tmdb_api_key.is_none());
        assert!(config.auth_secret.is_none());
        assert!(config.preferred_quality.is_none());
    }

    #[test]
    fn test_config_file_values_win_over_fallbacks() {
        let config = Config {
            tmdb_api_key: Some("file-key".to_string()),
            auth_secret: Some("file-secret".to_string()),
            preferred_quality: None,
        };

        // Env vars are unset in the test harness
        if std::env::var("TMDB_API_KEY").is_err() {
            assert_eq!(config.tmdb_api_key(), "file-key");
        }
        if std::env::var("STREAMVIBE_AUTH_SECRET").is_err() {
            assert_eq!(config.auth_secret(), "file-secret");
        }
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config {
            tmdb_api_key: Some("abc123".to_string()),
            auth_secret: None,
            preferred_quality: Some("HD".to_string()),
        };

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.tmdb_api_key.as_deref(), Some("abc123"));
        assert_eq!(parsed.preferred_quality.as_deref(), Some("HD"));
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(config.tmdb_api_key.is_none());
    }

    #[test]
    fn test_preferred_source_quality() {
        let mut config = Config::default();
        assert_eq!(config.preferred_source_quality(), None);

        config.preferred_quality = Some("4K".to_string());
        assert_eq!(config.preferred_source_quality(), Some(SourceQuality::Uhd4k));

        config.preferred_quality = Some("ultra".to_string());
        assert_eq!(config.preferred_source_quality(), None);
    }
}

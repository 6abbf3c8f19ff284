//! Saved CLI settings.
//!
//! Lives in `config.toml` under the platform config directory
//! (`$XDG_CONFIG_HOME/stagepost` on Linux). Command-line flags and
//! `STAGEPOST_*` environment variables take precedence over it.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stagepost_business::BusinessConfig;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub max_file_size_mb: Option<u64>,
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("dev", "stagepost", "stagepost")
            .context("Failed to determine config directory")?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, or the default configuration if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Settings for one session; `Some` overrides win over the saved values.
    pub fn business_config(
        &self,
        api_url: Option<String>,
        token: Option<String>,
    ) -> BusinessConfig {
        let mut config = match api_url.or_else(|| self.api_url.clone()) {
            Some(url) => BusinessConfig::new(url),
            None => BusinessConfig::default(),
        };

        if let Some(token) = token.or_else(|| self.token.clone()) {
            config = config.with_token(token);
        }
        if let Some(limit) = self.max_file_size_mb {
            config = config.with_max_file_size_mb(limit);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            api_url: Some("https://pm.example.com".to_owned()),
            token: Some("secret".to_owned()),
            max_file_size_mb: Some(20),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_file_size_mb = \"lots\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides_win_over_saved_values() {
        let config = Config {
            api_url: Some("https://saved.example.com".to_owned()),
            token: Some("saved".to_owned()),
            max_file_size_mb: Some(10),
        };

        let merged = config.business_config(Some("https://flag.example.com".to_owned()), None);
        assert_eq!(merged.api_base_url, "https://flag.example.com");
        assert_eq!(merged.token(), Some("saved"));
        assert_eq!(merged.max_file_size_mb, 10);

        let merged = config.business_config(None, Some("flag".to_owned()));
        assert_eq!(merged.api_base_url, "https://saved.example.com");
        assert_eq!(merged.token(), Some("flag"));
    }

    #[test]
    fn test_empty_config_uses_business_defaults() {
        let merged = Config::default().business_config(None, None);
        let defaults = BusinessConfig::default();
        assert_eq!(merged.api_base_url, defaults.api_base_url);
        assert_eq!(merged.max_file_size_mb, defaults.max_file_size_mb);
        assert!(merged.token().is_none());
    }
}

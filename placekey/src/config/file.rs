//! Configuration file handling for `~/.placekey/config.ini`.

use super::settings::ConfigFile;
use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding `[api] key`.
pub const API_KEY_ENV: &str = "PLACEKEY_API_KEY";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// Failed to write the config file
    #[error("Failed to write config file: {0}")]
    Write(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create the config directory
    #[error("Failed to create config directory: {0}")]
    Directory(std::io::Error),
}

impl ConfigFile {
    /// Load from `~/.placekey/config.ini`, then apply [`API_KEY_ENV`].
    ///
    /// A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&config_file_path())?;
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Replace the API key with a non-empty override.
    pub fn apply_api_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key.map(|k| k.trim().to_string()) {
            if !key.is_empty() {
                self.api.key = Some(key);
            }
        }
    }

    /// Save to `~/.placekey/config.ini`.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Directory)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigError::Write(e.to_string()))
    }
}

/// Path to the config directory (`~/.placekey`).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".placekey")
}

/// Path to the config file (`~/.placekey/config.ini`).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.ini");

        let mut config = ConfigFile::default();
        config.api.key = Some("my-key".to_string());
        config.api.max_retries = 5;
        config.cache.capacity = 42;
        config.rate_limit.batch_requests = 9;
        config.batch.chunk_size = 25;
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_saved_default_has_no_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        ConfigFile::default().save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert!(loaded.api.key.is_none());
    }

    #[test]
    fn test_api_key_override() {
        let mut config = ConfigFile::default();
        config.api.key = Some("from-file".to_string());

        config.apply_api_key_override(Some("  ".to_string()));
        assert_eq!(config.api.key.as_deref(), Some("from-file"));

        config.apply_api_key_override(None);
        assert_eq!(config.api.key.as_deref(), Some("from-file"));

        config.apply_api_key_override(Some("from-env".to_string()));
        assert_eq!(config.api.key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_config_paths() {
        assert!(config_directory().ends_with(".placekey"));
        assert!(config_file_path().ends_with(".placekey/config.ini"));
    }
}

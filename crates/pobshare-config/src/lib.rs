use std::path::{Path, PathBuf};
use std::time::Duration;

use pobshare_engine::ImportConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Optional overrides for the engine's reference bounds.
///
/// Every field defaults to the engine's shipped value when absent, so an
/// empty config file is valid.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub max_encoded_len: Option<usize>,
    pub max_decompressed_len: Option<usize>,
    pub fetch_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/pobshare");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Applies the overrides present in this file on top of a base
    /// engine configuration.
    pub fn apply(&self, mut base: ImportConfig) -> ImportConfig {
        if let Some(max_encoded_len) = self.max_encoded_len {
            base.max_encoded_len = max_encoded_len;
        }
        if let Some(max_decompressed_len) = self.max_decompressed_len {
            base.max_decompressed_len = max_decompressed_len;
        }
        if let Some(secs) = self.fetch_timeout_secs {
            base.fetch_timeout = Duration::from_secs(secs);
        }
        base
    }
}
